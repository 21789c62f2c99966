use std::fmt;

/// JSON pointer used to locate errors, displayed in URI-fragment form
/// (`#/properties/a/items`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    pub fn root() -> Self {
        Self::default()
    }

    /// Run `f` one segment deeper, restoring the pointer afterwards.
    pub fn with<R>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.segments.push(segment.to_owned());
        let out = f(self);
        self.segments.pop();
        out
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.segments {
            // RFC 6901: '~' before '/'
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_characters() {
        let mut at = Pointer::root();
        let shown = at.with("properties", |at| at.with("a/b~c", |at| at.to_string()));
        assert_eq!(shown, "#/properties/a~1b~0c");
        assert_eq!(at.to_string(), "#");
    }
}
