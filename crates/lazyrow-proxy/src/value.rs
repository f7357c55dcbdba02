//! Field values and the uninitialized marker

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ProxyError, ProxyResult};

/// Scalar value types stored in entity fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScalarValue {
	/// Text
	String(String),
	/// 64-bit signed integer
	Integer(i64),
	/// 64-bit float
	Float(f64),
	/// Boolean
	Boolean(bool),
	/// SQL `NULL`; a loaded value, not the uninitialized marker
	Null,
}

impl From<String> for ScalarValue {
	fn from(s: String) -> Self {
		ScalarValue::String(s)
	}
}

impl From<&str> for ScalarValue {
	fn from(s: &str) -> Self {
		ScalarValue::String(s.to_string())
	}
}

impl From<i64> for ScalarValue {
	fn from(i: i64) -> Self {
		ScalarValue::Integer(i)
	}
}

impl From<i32> for ScalarValue {
	fn from(i: i32) -> Self {
		ScalarValue::Integer(i64::from(i))
	}
}

impl From<f64> for ScalarValue {
	fn from(f: f64) -> Self {
		ScalarValue::Float(f)
	}
}

impl From<bool> for ScalarValue {
	fn from(b: bool) -> Self {
		ScalarValue::Boolean(b)
	}
}

impl fmt::Display for ScalarValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScalarValue::String(s) => write!(f, "{:?}", s),
			ScalarValue::Integer(i) => write!(f, "{}", i),
			ScalarValue::Float(v) => write!(f, "{}", v),
			ScalarValue::Boolean(b) => write!(f, "{}", b),
			ScalarValue::Null => f.write_str("null"),
		}
	}
}

impl ScalarValue {
	/// Try to convert to String
	///
	/// # Examples
	///
	/// ```
	/// use lazyrow_proxy::ScalarValue;
	///
	/// let value = ScalarValue::String("hello".to_string());
	/// assert_eq!(value.as_string().unwrap(), "hello");
	///
	/// let int_value = ScalarValue::Integer(42);
	/// assert!(int_value.as_string().is_err());
	/// ```
	pub fn as_string(&self) -> ProxyResult<String> {
		match self {
			ScalarValue::String(s) => Ok(s.clone()),
			_ => Err(self.mismatch("String")),
		}
	}

	/// Try to convert to i64
	pub fn as_integer(&self) -> ProxyResult<i64> {
		match self {
			ScalarValue::Integer(i) => Ok(*i),
			_ => Err(self.mismatch("Integer")),
		}
	}

	/// Try to convert to f64
	///
	/// Integers widen to floats.
	pub fn as_float(&self) -> ProxyResult<f64> {
		match self {
			ScalarValue::Float(f) => Ok(*f),
			ScalarValue::Integer(i) => Ok(*i as f64),
			_ => Err(self.mismatch("Float")),
		}
	}

	/// Try to convert to bool
	pub fn as_boolean(&self) -> ProxyResult<bool> {
		match self {
			ScalarValue::Boolean(b) => Ok(*b),
			_ => Err(self.mismatch("Boolean")),
		}
	}

	/// Check if value is null
	pub fn is_null(&self) -> bool {
		matches!(self, ScalarValue::Null)
	}

	fn mismatch(&self, expected: &str) -> ProxyError {
		ProxyError::TypeMismatch {
			expected: expected.to_string(),
			actual: format!("{:?}", self),
		}
	}
}

/// Rust types that can live in an entity field
///
/// Implemented for the scalar primitives and for `Option<T>`, which maps
/// `None` to [`ScalarValue::Null`].
pub trait ScalarType: Sized {
	/// Convert into the dynamic representation
	fn into_scalar(self) -> ScalarValue;

	/// Convert back from the dynamic representation
	fn from_scalar(value: ScalarValue) -> ProxyResult<Self>;
}

impl ScalarType for String {
	fn into_scalar(self) -> ScalarValue {
		ScalarValue::String(self)
	}

	fn from_scalar(value: ScalarValue) -> ProxyResult<Self> {
		match value {
			ScalarValue::String(s) => Ok(s),
			other => Err(other.mismatch("String")),
		}
	}
}

impl ScalarType for i64 {
	fn into_scalar(self) -> ScalarValue {
		ScalarValue::Integer(self)
	}

	fn from_scalar(value: ScalarValue) -> ProxyResult<Self> {
		value.as_integer()
	}
}

impl ScalarType for f64 {
	fn into_scalar(self) -> ScalarValue {
		ScalarValue::Float(self)
	}

	fn from_scalar(value: ScalarValue) -> ProxyResult<Self> {
		value.as_float()
	}
}

impl ScalarType for bool {
	fn into_scalar(self) -> ScalarValue {
		ScalarValue::Boolean(self)
	}

	fn from_scalar(value: ScalarValue) -> ProxyResult<Self> {
		value.as_boolean()
	}
}

impl ScalarType for ScalarValue {
	fn into_scalar(self) -> ScalarValue {
		self
	}

	fn from_scalar(value: ScalarValue) -> ProxyResult<Self> {
		Ok(value)
	}
}

impl<T: ScalarType> ScalarType for Option<T> {
	fn into_scalar(self) -> ScalarValue {
		match self {
			Some(value) => value.into_scalar(),
			None => ScalarValue::Null,
		}
	}

	fn from_scalar(value: ScalarValue) -> ProxyResult<Self> {
		match value {
			ScalarValue::Null => Ok(None),
			other => T::from_scalar(other).map(Some),
		}
	}
}

/// State of a persistent field on an entity instance
///
/// `Uninitialized` is the "not yet loaded" marker. It is distinct from every
/// loaded value, `Loaded(ScalarValue::Null)` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldState<T> {
	/// The value has not been loaded from storage
	Uninitialized,
	/// The value is known
	Loaded(T),
}

impl<T> FieldState<T> {
	/// Returns true while the field still holds the marker
	///
	/// # Examples
	///
	/// ```
	/// use lazyrow_proxy::FieldState;
	///
	/// let name: FieldState<String> = FieldState::Uninitialized;
	/// assert!(name.is_uninitialized());
	/// assert!(!FieldState::Loaded(1_i64).is_uninitialized());
	/// ```
	pub fn is_uninitialized(&self) -> bool {
		matches!(self, FieldState::Uninitialized)
	}

	/// Returns true once a value has been stored
	pub fn is_loaded(&self) -> bool {
		matches!(self, FieldState::Loaded(_))
	}

	/// Borrow the loaded value
	pub fn get(&self) -> Option<&T> {
		match self {
			FieldState::Loaded(value) => Some(value),
			FieldState::Uninitialized => None,
		}
	}

	/// Take the loaded value
	pub fn into_loaded(self) -> Option<T> {
		match self {
			FieldState::Loaded(value) => Some(value),
			FieldState::Uninitialized => None,
		}
	}
}

impl<T: Clone + ScalarType> FieldState<T> {
	/// Convert a typed field into its dynamic form, keeping the marker
	pub fn to_scalar(&self) -> FieldState<ScalarValue> {
		match self {
			FieldState::Loaded(value) => FieldState::Loaded(value.clone().into_scalar()),
			FieldState::Uninitialized => FieldState::Uninitialized,
		}
	}
}

impl<T: ScalarType> FieldState<T> {
	/// Convert a dynamic field state into a typed one
	pub fn from_scalar(state: FieldState<ScalarValue>) -> ProxyResult<Self> {
		match state {
			FieldState::Loaded(value) => T::from_scalar(value).map(FieldState::Loaded),
			FieldState::Uninitialized => Ok(FieldState::Uninitialized),
		}
	}
}

impl<T> Default for FieldState<T> {
	fn default() -> Self {
		FieldState::Uninitialized
	}
}

impl<T> From<T> for FieldState<T> {
	fn from(value: T) -> Self {
		FieldState::Loaded(value)
	}
}
