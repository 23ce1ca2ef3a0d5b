use std::fmt;

/// A value on exactly one of two channels: `Left` carries an error, `Right`
/// carries a success. There is no third state.
///
/// # Examples
///
/// ```
/// use future_cell::Either;
/// let parsed: Either<String, u32> = Either::Right(21);
/// assert_eq!(parsed.map(|n| n * 2), Either::Right(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<E, S> {
    Left(E),
    Right(S),
}

impl<E, S> Either<E, S> {
    /// Transforms the success payload, leaving `Left` untouched.
    pub fn map<NS>(self, mapping: impl FnOnce(S) -> NS) -> Either<E, NS> {
        match self {
            Either::Left(e) => Either::Left(e),
            Either::Right(s) => Either::Right(mapping(s)),
        }
    }

    /// Substitutes a whole new `Either` when `Right`, short-circuiting on
    /// `Left`.
    ///
    /// # Examples
    ///
    /// ```
    /// use future_cell::Either;
    /// let checked: Either<String, i32> = Either::Right(-3).flat_map(|n| {
    ///     if n >= 0 {
    ///         Either::Right(n)
    ///     } else {
    ///         Either::Left(format!("{n} is negative"))
    ///     }
    /// });
    /// assert_eq!(checked, Either::Left("-3 is negative".to_owned()));
    /// ```
    pub fn flat_map<NS>(self, mapping: impl FnOnce(S) -> Either<E, NS>) -> Either<E, NS> {
        match self {
            Either::Left(e) => Either::Left(e),
            Either::Right(s) => mapping(s),
        }
    }

    /// Discards both payloads, keeping only which channel was active.
    pub fn void(self) -> Either<(), ()> {
        match self {
            Either::Left(_) => Either::Left(()),
            Either::Right(_) => Either::Right(()),
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// The error payload, if this is `Left`.
    pub fn left(self) -> Option<E> {
        match self {
            Either::Left(e) => Some(e),
            Either::Right(_) => None,
        }
    }

    /// The success payload, if this is `Right`.
    pub fn right(self) -> Option<S> {
        match self {
            Either::Left(_) => None,
            Either::Right(s) => Some(s),
        }
    }
}

impl<E: fmt::Display, S: fmt::Display> fmt::Display for Either<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Either::Left(e) => write!(f, "Left{{{}}}", e),
            Either::Right(s) => write!(f, "Right{{{}}}", s),
        }
    }
}
