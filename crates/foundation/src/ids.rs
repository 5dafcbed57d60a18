/// Stable paddock identifier, assigned by the persistence layer at first save.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaddockId(String);

impl PaddockId {
    pub fn new(id: impl Into<String>) -> Self {
        PaddockId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaddockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaddockId {
    fn from(id: &str) -> Self {
        PaddockId::new(id)
    }
}

impl From<String> for PaddockId {
    fn from(id: String) -> Self {
        PaddockId(id)
    }
}
