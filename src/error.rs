pub type CitgenResult<T> = Result<T, CitgenError>;

#[derive(thiserror::Error, Debug)]
pub enum CitgenError {
    #[error("layout rejected: {0}")]
    Layout(String),

    #[error("avatar acquisition failed: {0}")]
    Acquire(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CitgenError {
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn acquire(msg: impl Into<String>) -> Self {
        Self::Acquire(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CitgenError::layout("x")
                .to_string()
                .contains("layout rejected:")
        );
        assert!(
            CitgenError::acquire("x")
                .to_string()
                .contains("avatar acquisition failed:")
        );
        assert!(CitgenError::render("x").to_string().contains("render failed:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CitgenError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
