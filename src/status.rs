use std::fmt;

/// One-line status shown alongside the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    LoadedFromCache,
    Fetching,
    Showing(usize),
    Updated(usize),
    Viewing(String),
    NotFound,
    FailedToLoad,
    Unexpected,
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Status::NotFound | Status::FailedToLoad | Status::Unexpected
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::LoadedFromCache => write!(f, "Loaded mods from cache."),
            Status::Fetching => write!(f, "Fetching mods..."),
            Status::Showing(count) => write!(f, "Showing {} mods.", count),
            Status::Updated(count) => write!(f, "Showing {} mods (updated).", count),
            Status::Viewing(name) => write!(f, "Viewing {}", name),
            Status::NotFound => write!(f, "Mod not found."),
            Status::FailedToLoad => write!(f, "Failed to load mod list."),
            Status::Unexpected => {
                write!(f, "An unexpected error occurred while loading mods.")
            }
        }
    }
}
