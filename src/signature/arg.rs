//! Argument values carried by a [`CallSignature`](super::CallSignature).

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single argument value recorded for a call.
///
/// Mocks of different methods share one registry and one recorder, so
/// argument values are kept in a closed set of owned variants rather than
/// as generic types. Conversions exist from the common primitive types,
/// strings, `Option` and `Vec`.
///
/// Floats compare by their total ordering: `NaN` equals `NaN` and `0.0`
/// does not equal `-0.0`.
///
/// # Example
///
/// ```rust
/// use stubkit::signature::Arg;
///
/// assert_eq!(Arg::from(20.0), Arg::Float(20.0));
/// assert_eq!(Arg::from("manisha"), Arg::Str("manisha".to_string()));
/// assert_eq!(Arg::from(None::<i32>), Arg::None);
/// ```
#[derive(Clone, Debug)]
pub enum Arg {
    /// The unit value.
    Unit,
    /// An absent optional value.
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// A character.
    Char(char),
    /// An owned string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Arg>),
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Unit, Arg::Unit) | (Arg::None, Arg::None) => true,
            (Arg::Bool(a), Arg::Bool(b)) => a == b,
            (Arg::Int(a), Arg::Int(b)) => a == b,
            (Arg::Uint(a), Arg::Uint(b)) => a == b,
            (Arg::Float(a), Arg::Float(b)) => a.total_cmp(b).is_eq(),
            (Arg::Char(a), Arg::Char(b)) => a == b,
            (Arg::Str(a), Arg::Str(b)) => a == b,
            (Arg::List(a), Arg::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Arg {}

impl Hash for Arg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Arg::Unit | Arg::None => {}
            Arg::Bool(v) => v.hash(state),
            Arg::Int(v) => v.hash(state),
            Arg::Uint(v) => v.hash(state),
            // Consistent with `total_cmp` equality.
            Arg::Float(v) => v.to_bits().hash(state),
            Arg::Char(v) => v.hash(state),
            Arg::Str(v) => v.hash(state),
            Arg::List(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Unit => write!(f, "()"),
            Arg::None => write!(f, "None"),
            Arg::Bool(v) => write!(f, "{v}"),
            Arg::Int(v) => write!(f, "{v}"),
            Arg::Uint(v) => write!(f, "{v}"),
            Arg::Float(v) => write!(f, "{v:?}"),
            Arg::Char(v) => write!(f, "{v:?}"),
            Arg::Str(v) => write!(f, "{v:?}"),
            Arg::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<()> for Arg {
    fn from((): ()) -> Self {
        Arg::Unit
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::Uint(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Arg::Uint(value as u64)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::None, Into::into)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(value: Vec<T>) -> Self {
        Arg::List(value.into_iter().map(Into::into).collect())
    }
}

/// Conversion from a recorded [`Arg`] back into a concrete type.
///
/// Used by answer functions to read the arguments of the call they are
/// answering.
pub trait FromArg: Sized {
    /// Convert the argument, or `None` if the variant does not fit.
    fn from_arg(arg: &Arg) -> Option<Self>;
}

impl FromArg for bool {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for i64 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Int(v) => Some(*v),
            Arg::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl FromArg for i32 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        i64::from_arg(arg).and_then(|v| i32::try_from(v).ok())
    }
}

impl FromArg for u64 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Uint(v) => Some(*v),
            Arg::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl FromArg for f64 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for char {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Char(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for String {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Build a `Vec<Arg>` from a list of expressions.
///
/// # Example
///
/// ```rust
/// use stubkit::{args, signature::Arg};
///
/// let args = args![20.0, 10.0];
/// assert_eq!(args, vec![Arg::Float(20.0), Arg::Float(10.0)]);
///
/// let empty = args![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::signature::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::signature::Arg::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(arg: &Arg) -> u64 {
        let mut hasher = DefaultHasher::new();
        arg.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_float_equality_uses_total_order() {
        assert_eq!(Arg::Float(f64::NAN), Arg::Float(f64::NAN));
        assert_ne!(Arg::Float(0.0), Arg::Float(-0.0));
        assert_eq!(Arg::Float(20.0), Arg::Float(20.0));
    }

    #[test]
    fn test_equal_args_hash_equal() {
        let a = Arg::from(vec!["a", "b"]);
        let b = Arg::List(vec![Arg::Str("a".into()), Arg::Str("b".into())]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_variants_do_not_cross_match() {
        assert_ne!(Arg::Int(1), Arg::Uint(1));
        assert_ne!(Arg::Unit, Arg::None);
        assert_ne!(Arg::Str("1".into()), Arg::Int(1));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Arg::from(Some(3_u32)), Arg::Uint(3));
        assert_eq!(Arg::from(None::<&str>), Arg::None);
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(f64::from_arg(&Arg::Float(1.5)), Some(1.5));
        assert_eq!(i32::from_arg(&Arg::Int(-4)), Some(-4));
        assert_eq!(u64::from_arg(&Arg::Int(-4)), None);
        assert_eq!(String::from_arg(&Arg::from("x")), Some("x".to_string()));
        assert_eq!(bool::from_arg(&Arg::Int(1)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Arg::Float(20.0).to_string(), "20.0");
        assert_eq!(Arg::from("name").to_string(), "\"name\"");
        assert_eq!(Arg::from(vec![1_i32, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn test_args_macro() {
        let args = crate::args![1_i32, "two", 3.0];
        assert_eq!(args, vec![Arg::Int(1), Arg::from("two"), Arg::Float(3.0)]);
    }
}
