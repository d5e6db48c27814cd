//! Forest generation parameters.

use crate::error::GeneratorError;

/// Upper bound on `h_level + l_level`.
pub const MAX_TOTAL_LEVEL: u32 = 30;

/// Shape of a forest: `2^h_level` branches of `2^l_level` leaves each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForestConfig {
    /// Depth of the top tree combining branch roots
    pub h_level: u32,
    /// Depth of each branch
    pub l_level: u32,
    /// Offset, in branches, of the first branch's leaves
    pub pre_image: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            h_level: 4,
            l_level: 16,
            pre_image: 0,
        }
    }
}

impl ForestConfig {
    pub fn new(h_level: u32, l_level: u32, pre_image: u64) -> Self {
        Self {
            h_level,
            l_level,
            pre_image,
        }
    }

    /// Reject shapes that would not fit in memory or overflow leaf indices.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let total = self.h_level.saturating_add(self.l_level);
        if total > MAX_TOTAL_LEVEL {
            return Err(GeneratorError::InvalidLevels(format!(
                "hLevel + lLevel = {total} exceeds {MAX_TOTAL_LEVEL}"
            )));
        }
        Ok(())
    }

    /// Number of branches.
    pub fn branch_count(&self) -> usize {
        1usize << self.h_level
    }

    /// Number of leaves per branch.
    pub fn leaves_per_branch(&self) -> u64 {
        1u64 << self.l_level
    }

    /// Index of the first leaf of branch `branch`.
    pub fn start_index(&self, branch: usize) -> Result<u64, GeneratorError> {
        (branch as u64)
            .checked_add(self.pre_image)
            .and_then(|b| b.checked_mul(self.leaves_per_branch()))
            .ok_or(GeneratorError::IndexOverflow(branch))
    }

    /// Name of the JSON file written for this forest.
    pub fn output_file_name(&self) -> String {
        format!(
            "output_hLevel_{}_lLevel_{}_preImage_{}.json",
            self.h_level, self.l_level, self.pre_image
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForestConfig::default();

        assert_eq!(config.branch_count(), 16);
        assert_eq!(config.leaves_per_branch(), 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_start_index() {
        let config = ForestConfig::new(2, 3, 5);

        assert_eq!(config.start_index(0).unwrap(), 40);
        assert_eq!(config.start_index(3).unwrap(), 64);
    }

    #[test]
    fn test_start_index_overflow() {
        let config = ForestConfig::new(1, 20, u64::MAX);
        assert!(matches!(
            config.start_index(1),
            Err(GeneratorError::IndexOverflow(1))
        ));
    }

    #[test]
    fn test_too_many_levels() {
        assert!(ForestConfig::new(16, 16, 0).validate().is_err());
        assert!(ForestConfig::new(10, 20, 0).validate().is_ok());
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            ForestConfig::new(4, 16, 0).output_file_name(),
            "output_hLevel_4_lLevel_16_preImage_0.json"
        );
    }
}
