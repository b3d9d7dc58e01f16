//! Resolving drawn ids to submissions
//!
//! The build pipeline is external; it communicates validity through an
//! invalid marker file and the presence of the artifact.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::Layout;
use crate::house::{House, Submission, Validity};

/// Looks up the artifact and validity flag of a submission
pub trait SubmissionResolver {
    fn resolve(&self, house: House, id: &str) -> Submission;
}

/// Resolves submissions from the folder layout on disk
#[derive(Clone, Debug)]
pub struct FsResolver {
    layout: Layout,
}

impl FsResolver {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl SubmissionResolver for FsResolver {
    fn resolve(&self, house: House, id: &str) -> Submission {
        let artifact = self.layout.artifact_path(house, id);
        let validity = if self.layout.invalid_marker_path(house, id).exists() {
            Validity::Invalid
        } else if artifact.is_file() {
            Validity::Valid
        } else {
            Validity::Missing
        };

        Submission {
            id: id.to_string(),
            house,
            artifact,
            validity,
        }
    }
}

/// Fixed validity table; unlisted submissions are valid
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    flags: HashMap<(House, String), Validity>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for one submission
    pub fn with(mut self, house: House, id: &str, validity: Validity) -> Self {
        self.flags.insert((house, id.to_string()), validity);
        self
    }
}

impl SubmissionResolver for StaticResolver {
    fn resolve(&self, house: House, id: &str) -> Submission {
        let validity = self
            .flags
            .get(&(house, id.to_string()))
            .copied()
            .unwrap_or(Validity::Valid);
        Submission {
            id: id.to_string(),
            house,
            artifact: PathBuf::from(format!("{}_{}.red", id, house.number())),
            validity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_fs_resolver_flags() {
        let root = std::env::temp_dir().join(format!("housewar_resolver_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let layout = Layout::default().rooted(&root);
        let house = House::new(1).unwrap();

        let good = layout.submission_dir(house, "good");
        fs::create_dir_all(&good).unwrap();
        fs::write(layout.artifact_path(house, "good"), ";redcode\n").unwrap();

        let bad = layout.submission_dir(house, "bad");
        fs::create_dir_all(&bad).unwrap();
        fs::write(layout.artifact_path(house, "bad"), ";redcode\n").unwrap();
        fs::write(layout.invalid_marker_path(house, "bad"), "build timed out\n").unwrap();

        let resolver = FsResolver::new(layout.clone());
        assert_eq!(resolver.resolve(house, "good").validity, Validity::Valid);
        assert_eq!(resolver.resolve(house, "bad").validity, Validity::Invalid);
        let gone = resolver.resolve(house, "gone");
        assert_eq!(gone.validity, Validity::Missing);
        assert_eq!(gone.artifact, layout.artifact_path(house, "gone"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_static_resolver() {
        let h2 = House::new(2).unwrap();
        let resolver = StaticResolver::new().with(h2, "eve", Validity::Invalid);
        assert_eq!(resolver.resolve(h2, "eve").validity, Validity::Invalid);
        assert_eq!(resolver.resolve(h2, "sam").validity, Validity::Valid);
        assert_eq!(resolver.resolve(h2, "sam").artifact, PathBuf::from("sam_2.red"));
    }
}
