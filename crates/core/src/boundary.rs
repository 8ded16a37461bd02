//! Boundary parsing and center-point derivation.
//!
//! A boundary is supplied as free text, expected to be a JSON array of
//! exactly four numbers read positionally as `[left, top, right, bottom]`.
//! The ordering is not validated; inverted rectangles (left greater than
//! right, or top greater than bottom) are accepted since their midpoint is
//! still well-defined.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rectangle specification delimiting a region of a whole-slide image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

/// Midpoint of a [`Boundary`], used as the point of interest on an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterPoint {
	pub x: f64,
	pub y: f64,
}

/// Reasons a boundary text fails to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundaryError {
	/// The text is not a JSON array of numbers.
	#[error("boundary is not a JSON array of numbers: {0}")]
	Syntax(String),

	/// The array does not hold exactly four values.
	#[error("boundary must hold exactly 4 numbers, got {0}")]
	Arity(usize),

	/// One of the values is NaN or infinite.
	#[error("boundary values must be finite")]
	NotFinite,
}

impl Boundary {
	/// Parse a boundary from its textual representation.
	///
	/// Failures are expected during interactive editing and are recovered by
	/// callers; the only effect of an invalid boundary is that no center
	/// point is derived.
	pub fn parse(text: &str) -> Result<Self, BoundaryError> {
		let values: Vec<f64> = serde_json::from_str(text).map_err(|err| {
			log::debug!("boundary text rejected: {err}");
			BoundaryError::Syntax(err.to_string())
		})?;

		let [left, top, right, bottom] = values[..] else {
			log::debug!("boundary text has wrong arity: {}", values.len());
			return Err(BoundaryError::Arity(values.len()));
		};

		if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
			return Err(BoundaryError::NotFinite);
		}

		Ok(Self {
			left,
			top,
			right,
			bottom,
		})
	}

	/// Arithmetic midpoint of the rectangle.
	#[must_use]
	pub fn center(&self) -> CenterPoint {
		CenterPoint {
			x: (self.left + self.right) / 2.0,
			y: (self.top + self.bottom) / 2.0,
		}
	}
}
