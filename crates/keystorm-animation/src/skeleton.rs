//! Skeleton hierarchy and bone influence sets
//!
//! Bones are stored in topological order: a bone's parent always has a
//! smaller index. A single forward scan over the parent table therefore
//! visits every ancestor before its descendants.

use keystorm_core::{KeystormError, Result};

/// Bone hierarchy supplied by the avatar rendering host
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bone_names: Vec<String>,
    parents: Vec<Option<usize>>,
}

impl Skeleton {
    /// Create a skeleton from a parent-index table with generated bone names
    pub fn new(parents: Vec<Option<usize>>) -> Result<Self> {
        let bone_names = (0..parents.len()).map(|i| format!("bone_{}", i)).collect();
        Self::with_names(bone_names, parents)
    }

    /// Create a skeleton with named bones.
    ///
    /// Fails when the tables differ in length or a parent index is not
    /// strictly less than its child's index.
    pub fn with_names(bone_names: Vec<String>, parents: Vec<Option<usize>>) -> Result<Self> {
        if bone_names.len() != parents.len() {
            return Err(KeystormError::SkeletonError(format!(
                "{} bone names for {} parent entries",
                bone_names.len(),
                parents.len()
            )));
        }
        for (bone, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                if parent >= bone {
                    return Err(KeystormError::SkeletonError(format!(
                        "bone {} has parent {}; parents must precede their children",
                        bone, parent
                    )));
                }
            }
        }
        Ok(Self {
            bone_names,
            parents,
        })
    }

    pub fn bone_count(&self) -> usize {
        self.parents.len()
    }

    /// Parent of `bone`, or `None` for a root (or an out-of-range index)
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.parents.get(bone).copied().flatten()
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    pub fn bone_name(&self, bone: usize) -> Option<&str> {
        self.bone_names.get(bone).map(String::as_str)
    }

    /// Look up a bone index by name
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_names.iter().position(|n| n == name)
    }

    /// Reject bone indices outside the skeleton
    pub fn check_bone(&self, bone: usize) -> Result<()> {
        if bone < self.bone_count() {
            Ok(())
        } else {
            Err(KeystormError::InvalidBone {
                bone,
                bone_count: self.bone_count(),
            })
        }
    }

    /// The bones controlled by `root`: the root itself plus all its descendants
    pub fn influence_set(&self, root: usize) -> Result<BoneMask> {
        self.influence_set_of(&[root])
    }

    /// Union of the influence sets of several roots
    pub fn influence_set_of(&self, roots: &[usize]) -> Result<BoneMask> {
        let count = self.bone_count();
        let mut included = vec![false; count];
        let mut first = count;
        for &root in roots {
            self.check_bone(root)?;
            included[root] = true;
            first = first.min(root);
        }

        // Parents precede children, so one pass from the lowest root covers every descendant
        for bone in first..count {
            if let Some(parent) = self.parents[bone] {
                if included[parent] {
                    included[bone] = true;
                }
            }
        }

        let bones = included
            .iter()
            .enumerate()
            .filter_map(|(bone, &inside)| inside.then_some(bone))
            .collect();
        Ok(BoneMask { bones })
    }
}

/// Sorted, de-duplicated set of bone indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoneMask {
    bones: Box<[usize]>,
}

impl BoneMask {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, bone: usize) -> bool {
        self.bones.binary_search(&bone).is_ok()
    }

    pub fn bones(&self) -> &[usize] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
