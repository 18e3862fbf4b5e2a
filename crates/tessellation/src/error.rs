/// The stroke tessellator's result type.
pub type TessellationResult = Result<(), TessellationError>;

/// An error that can happen while generating geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    InvalidVertex,
    TooManyVertices,
}

#[cfg(feature = "std")]
impl core::fmt::Display for GeometryBuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GeometryBuilderError::InvalidVertex => {
                std::write!(f, "Invalid vertex")
            },
            GeometryBuilderError::TooManyVertices => {
                std::write!(f, "Too many vertices")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeometryBuilderError {}

/// The tessellator was driven in the wrong order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UsageError {
    /// `begin` was called while a batch is already in progress.
    BeginWhileDrawing,
    /// `end` was called without a matching `begin`.
    EndWithoutBegin,
    /// `move_to` or `line_to` was called outside of a `begin`/`end` pair.
    CommandOutsideOfBatch,
}

#[cfg(feature = "std")]
impl core::fmt::Display for UsageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UsageError::BeginWhileDrawing => {
                std::write!(f, "end() must be called before begin()")
            },
            UsageError::EndWithoutBegin => {
                std::write!(f, "begin() must be called before end()")
            },
            UsageError::CommandOutsideOfBatch => {
                std::write!(f, "Path command issued outside of begin()/end()")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UsageError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedParameter {
    PositionIsNaN,
    LineWidth,
    MiterLimit,
    Smoothing,
    RoundJoinStep,
}

#[cfg(feature = "std")]
impl core::fmt::Display for UnsupportedParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UnsupportedParameter::PositionIsNaN => {
                std::write!(f, "Position is not a number")
            },
            UnsupportedParameter::LineWidth => {
                std::write!(f, "Line width must be a non-negative number")
            },
            UnsupportedParameter::MiterLimit => {
                std::write!(f, "Miter limit must be in (0, 1]")
            },
            UnsupportedParameter::Smoothing => {
                std::write!(f, "Smoothing factors must be non-negative numbers")
            },
            UnsupportedParameter::RoundJoinStep => {
                std::write!(f, "Round join step must be a positive angle")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnsupportedParameter {}

/// The stroke tessellator's error enumeration.
#[derive(Clone, Debug, PartialEq)]
pub enum TessellationError {
    Usage(UsageError),
    UnsupportedParameter(UnsupportedParameter),
    GeometryBuilder(GeometryBuilderError),
}

#[cfg(feature = "std")]
impl core::fmt::Display for TessellationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TessellationError::Usage(e) => {
                std::write!(f, "Usage error: {e}")
            },
            TessellationError::UnsupportedParameter(e) => {
                std::write!(f, "Unsupported parameter: {e}")
            },
            TessellationError::GeometryBuilder(e) => {
                std::write!(f, "Geometry builder error: {e}")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TessellationError {}

impl core::convert::From<GeometryBuilderError> for TessellationError {
    fn from(value: GeometryBuilderError) -> Self {
        Self::GeometryBuilder(value)
    }
}

impl core::convert::From<UsageError> for TessellationError {
    fn from(value: UsageError) -> Self {
        Self::Usage(value)
    }
}

impl core::convert::From<UnsupportedParameter> for TessellationError {
    fn from(value: UnsupportedParameter) -> Self {
        Self::UnsupportedParameter(value)
    }
}

#[cfg(feature = "std")]
#[test]
fn error_messages() {
    use std::string::ToString;

    let err: TessellationError = UsageError::EndWithoutBegin.into();
    assert_eq!(err.to_string(), "Usage error: begin() must be called before end()");

    let err: TessellationError = GeometryBuilderError::TooManyVertices.into();
    assert_eq!(err.to_string(), "Geometry builder error: Too many vertices");

    let err: TessellationError = UnsupportedParameter::MiterLimit.into();
    assert_eq!(err, TessellationError::UnsupportedParameter(UnsupportedParameter::MiterLimit));
}
