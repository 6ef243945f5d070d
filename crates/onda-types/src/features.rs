//! Feature flags a module is allowed to use

use bitflags::bitflags;

bitflags! {
    /// The optional bytecode-format extensions enabled for a module.
    ///
    /// The empty set is the base (MVP) feature level.
    pub struct FeatureSet: u32 {
        const ATOMICS = 1 << 0;
        const MUTABLE_GLOBALS = 1 << 1;
        const TRUNC_SAT = 1 << 2;
        const SIMD = 1 << 3;
        const BULK_MEMORY = 1 << 4;
        const SIGN_EXT = 1 << 5;
        const EXCEPTION_HANDLING = 1 << 6;
        const TAIL_CALL = 1 << 7;
        const REFERENCE_TYPES = 1 << 8;
        const MULTIVALUE = 1 << 9;
        const GC = 1 << 10;
        const MEMORY64 = 1 << 11;
    }
}

impl FeatureSet {
    /// The base feature level, with no extensions enabled
    pub fn mvp() -> FeatureSet {
        FeatureSet::empty()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        FeatureSet::mvp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_set() {
        let mut features = FeatureSet::mvp();
        assert!(features.is_empty());

        features |= FeatureSet::SIMD | FeatureSet::BULK_MEMORY;
        assert!(features.contains(FeatureSet::SIMD));
        assert!(!features.contains(FeatureSet::ATOMICS));
        assert!(FeatureSet::all().contains(features));
    }
}
