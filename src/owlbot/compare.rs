//! Order-independent structural equality for owlbot configs.
//!
//! List fields compare as multisets (sort both sides, then compare
//! element-wise), with one deliberate asymmetry: an absent list never
//! equals a present one, even a present-but-empty one.

use crate::owlbot::schema::OwlbotConfig;

/// Order-independent equivalence of two optional lists.
///
/// The branching is part of the contract, not an optimization:
/// 1. both absent: equivalent.
/// 2. exactly one absent: not equivalent (key presence matters).
/// 3. both present, either empty: equivalent only when both are empty.
/// 4. otherwise: sorted copies must match element-wise.
pub fn lists_equivalent<T>(list1: Option<&[T]>, list2: Option<&[T]>) -> bool
where
    T: Ord + Clone,
{
    match (list1, list2) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(list1), Some(list2)) => {
            if list1.is_empty() || list2.is_empty() {
                return list1.is_empty() && list2.is_empty();
            }
            let mut sorted1 = list1.to_vec();
            let mut sorted2 = list2.to_vec();
            sorted1.sort();
            sorted2.sort();
            sorted1 == sorted2
        }
    }
}

impl PartialEq for OwlbotConfig {
    fn eq(&self, other: &Self) -> bool {
        self.api_name == other.api_name
            && self.begin_after_commit_hash == other.begin_after_commit_hash
            && self.docker == other.docker
            && self.squash == other.squash
            && lists_equivalent(self.deep_copy_regex.as_deref(), other.deep_copy_regex.as_deref())
            && lists_equivalent(
                self.deep_remove_regex.as_deref(),
                other.deep_remove_regex.as_deref(),
            )
            && lists_equivalent(
                self.deep_preserve_regex.as_deref(),
                other.deep_preserve_regex.as_deref(),
            )
    }
}
