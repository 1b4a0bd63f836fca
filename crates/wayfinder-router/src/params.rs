//! Typed path parameter extraction.
//!
//! Views that want typed parameters pull them out of a [`MatchResult`]
//! with [`MatchResult::extract`]:
//!
//! ```ignore
//! use wayfinder_router::Path;
//!
//! let Path(name): Path<String> = matched.extract()?;
//! let (region, code): (String, u32) = matched.extract()?;
//! ```
//!
//! [`MatchResult`]: crate::MatchResult
//! [`MatchResult::extract`]: crate::MatchResult::extract

use std::collections::HashMap;
use std::ops::Deref;

use crate::error::PathError;

/// Borrowed view of the parameters of one match.
///
/// Values are ordered as they appear in the pattern so tuple extraction
/// works by index.
#[derive(Debug, Clone, Copy)]
pub struct ParamContext<'a> {
	params: &'a HashMap<String, String>,
	values: &'a [String],
}

impl<'a> ParamContext<'a> {
	/// Creates a parameter context.
	pub fn new(params: &'a HashMap<String, String>, values: &'a [String]) -> Self {
		Self { params, values }
	}

	/// Returns a parameter by name.
	pub fn get(&self, name: &str) -> Option<&'a str> {
		self.params.get(name).map(String::as_str)
	}

	/// Returns the number of captured parameters.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns whether no parameters were captured.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	fn parse_at<T>(&self, index: usize) -> Result<T, PathError>
	where
		T: std::str::FromStr,
		T::Err: std::fmt::Display,
	{
		let raw = self.values.get(index).ok_or(PathError::CountMismatch {
			expected: index + 1,
			actual: self.values.len(),
		})?;
		raw.parse::<T>().map_err(|e| PathError::ParseError {
			param: index.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.clone(),
			reason: e.to_string(),
		})
	}

	fn expect_count(&self, expected: usize) -> Result<(), PathError> {
		if self.values.len() != expected {
			return Err(PathError::CountMismatch {
				expected,
				actual: self.values.len(),
			});
		}
		Ok(())
	}
}

/// Trait for extracting typed values from path parameters.
pub trait FromPath: Sized {
	/// Extracts `Self` from the parameter context.
	///
	/// # Errors
	///
	/// Returns [`PathError::CountMismatch`] if the number of parameters doesn't match.
	/// Returns [`PathError::ParseError`] if parameter parsing fails.
	fn from_path(ctx: &ParamContext<'_>) -> Result<Self, PathError>;
}

/// Single path parameter extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
	/// Unwraps the inner value.
	pub fn into_inner(self) -> T {
		self.0
	}
}

impl<T> Deref for Path<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<T: FromPath> FromPath for Path<T> {
	fn from_path(ctx: &ParamContext<'_>) -> Result<Self, PathError> {
		T::from_path(ctx).map(Path)
	}
}

macro_rules! impl_from_path_for_scalar {
	($($ty:ty),* $(,)?) => {
		$(
			impl FromPath for $ty {
				fn from_path(ctx: &ParamContext<'_>) -> Result<Self, PathError> {
					ctx.expect_count(1)?;
					ctx.parse_at(0)
				}
			}
		)*
	};
}

impl_from_path_for_scalar!(String, bool, i32, i64, u32, u64, usize, f64);

macro_rules! impl_from_path_for_tuple {
	($count:expr; $($idx:tt => $ty:ident),+) => {
		impl<$($ty),+> FromPath for ($($ty,)+)
		where
			$($ty: std::str::FromStr,)+
			$(<$ty as std::str::FromStr>::Err: std::fmt::Display,)+
		{
			fn from_path(ctx: &ParamContext<'_>) -> Result<Self, PathError> {
				ctx.expect_count($count)?;
				Ok(($(ctx.parse_at::<$ty>($idx)?,)+))
			}
		}
	};
}

impl_from_path_for_tuple!(2; 0 => A, 1 => B);
impl_from_path_for_tuple!(3; 0 => A, 1 => B, 2 => C);
impl_from_path_for_tuple!(4; 0 => A, 1 => B, 2 => C, 3 => D);
