use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Fault hypothesis a [SatelliteSubset] stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FaultHypothesis {
    /// Fault free: every satellite in view
    FullSet,
    /// Exactly one faulty satellite, excluded
    ExcludeOne,
    /// Exactly two faulty satellites, excluded
    ExcludeTwo,
}

impl FaultHypothesis {
    /// Number of excluded satellites
    pub fn excluded(&self) -> usize {
        match self {
            Self::FullSet => 0,
            Self::ExcludeOne => 1,
            Self::ExcludeTwo => 2,
        }
    }
}

impl std::fmt::Display for FaultHypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullSet => write!(f, "full-set"),
            Self::ExcludeOne => write!(f, "exclude-one"),
            Self::ExcludeTwo => write!(f, "exclude-two"),
        }
    }
}

/// [SatelliteSubset] is an ordered selection of satellites in view
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SatelliteSubset {
    /// [FaultHypothesis]
    pub hypothesis: FaultHypothesis,
    /// Satellites kept, in the order of the satellites in view
    pub satellites: Vec<String>,
    /// Satellites excluded by the hypothesis
    pub excluded: Vec<String>,
}

impl SatelliteSubset {
    /// Full set: nothing excluded
    pub fn full_set(in_view: &[String]) -> Self {
        Self {
            hypothesis: FaultHypothesis::FullSet,
            satellites: in_view.to_vec(),
            excluded: Vec::new(),
        }
    }

    /// Number of satellites kept
    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    /// True if no satellites are kept
    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}

/// Enumerates every [SatelliteSubset] of the satellites in view matching
/// the [FaultHypothesis]: C(n, k) subsets for k excluded satellites, in
/// lexicographic order of the excluded positions. Satellites keep their
/// relative order within each subset.
pub fn enumerate(
    in_view: &[String],
    hypothesis: FaultHypothesis,
) -> impl Iterator<Item = SatelliteSubset> + '_ {
    let k = hypothesis.excluded();

    (0..in_view.len()).combinations(k).map(move |excluded| {
        let satellites = in_view
            .iter()
            .enumerate()
            .filter(|(i, _)| !excluded.contains(i))
            .map(|(_, id)| id.clone())
            .collect();

        SatelliteSubset {
            hypothesis,
            satellites,
            excluded: excluded.iter().map(|i| in_view[*i].clone()).collect(),
        }
    })
}

/// Exclude-one subsets: n of them
pub fn exclude_one(in_view: &[String]) -> Vec<SatelliteSubset> {
    enumerate(in_view, FaultHypothesis::ExcludeOne).collect()
}

/// Exclude-two subsets: n(n-1)/2 of them
pub fn exclude_two(in_view: &[String]) -> Vec<SatelliteSubset> {
    enumerate(in_view, FaultHypothesis::ExcludeTwo).collect()
}

#[cfg(test)]
mod test {
    use super::{enumerate, exclude_one, exclude_two, FaultHypothesis};
    use rstest::*;

    fn satellites(n: usize) -> Vec<String> {
        (1..=n).map(|prn| format!("G{:02}", prn)).collect()
    }

    #[rstest]
    #[case(4, 4, 6)]
    #[case(5, 5, 10)]
    #[case(6, 6, 15)]
    #[case(12, 12, 66)]
    fn subset_counts(#[case] n: usize, #[case] n_one: usize, #[case] n_two: usize) {
        let in_view = satellites(n);
        assert_eq!(exclude_one(&in_view).len(), n_one);
        assert_eq!(exclude_two(&in_view).len(), n_two);
    }

    #[test]
    fn exclude_one_order() {
        let in_view = satellites(4);
        let subsets = exclude_one(&in_view);
        assert_eq!(subsets[0].satellites, vec!["G02", "G03", "G04"]);
        assert_eq!(subsets[0].excluded, vec!["G01"]);
        assert_eq!(subsets[3].satellites, vec!["G01", "G02", "G03"]);
        assert_eq!(subsets[3].excluded, vec!["G04"]);
        for subset in subsets {
            assert_eq!(subset.hypothesis, FaultHypothesis::ExcludeOne);
            assert_eq!(subset.len(), 3);
        }
    }

    #[test]
    fn exclude_two_is_exhaustive() {
        let in_view = satellites(5);
        let subsets = exclude_two(&in_view);
        for subset in subsets.iter() {
            assert_eq!(subset.len(), 3);
            assert_eq!(subset.excluded.len(), 2);
            for id in subset.excluded.iter() {
                assert!(!subset.satellites.contains(id));
            }
        }
        // pairs are unique
        for (i, a) in subsets.iter().enumerate() {
            for b in subsets.iter().skip(i + 1) {
                assert_ne!(a.excluded, b.excluded);
            }
        }
    }

    #[test]
    fn full_set() {
        let in_view = satellites(3);
        let full = enumerate(&in_view, FaultHypothesis::FullSet).collect::<Vec<_>>();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].satellites, in_view);
        assert!(full[0].excluded.is_empty());
    }
}
