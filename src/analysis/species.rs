//! Species classification
//!
//! Every site of a structure is routed to exactly one [`SpeciesGroup`]. Sodium
//! is split by local environment: a Na site with a phosphorus neighbor inside
//! the split radius is `Na2`, otherwise `Na1`. Other known elements map to a
//! group of the same name; unknown elements are dropped.

use crate::structure::Structure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Elements handled by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Na,
    Ti,
    Mn,
    P,
    O,
}

impl Element {
    pub const ALL: [Element; 5] = [Element::Na, Element::Ti, Element::Mn, Element::P, Element::O];

    pub fn symbol(self) -> &'static str {
        match self {
            Element::Na => "Na",
            Element::Ti => "Ti",
            Element::Mn => "Mn",
            Element::P => "P",
            Element::O => "O",
        }
    }

    /// Look up an element by its exact symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.symbol() == symbol)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s.trim()).ok_or_else(|| format!("unknown element '{}'", s))
    }
}

/// Classification label of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpeciesGroup {
    /// Na without a P neighbor inside the split radius
    Na1,
    /// Na with a P neighbor inside the split radius
    Na2,
    Ti,
    Mn,
    P,
    O,
}

impl SpeciesGroup {
    pub const ALL: [SpeciesGroup; 6] = [
        SpeciesGroup::Na1,
        SpeciesGroup::Na2,
        SpeciesGroup::Ti,
        SpeciesGroup::Mn,
        SpeciesGroup::P,
        SpeciesGroup::O,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpeciesGroup::Na1 => "Na1",
            SpeciesGroup::Na2 => "Na2",
            SpeciesGroup::Ti => "Ti",
            SpeciesGroup::Mn => "Mn",
            SpeciesGroup::P => "P",
            SpeciesGroup::O => "O",
        }
    }

    /// Element every member of this group has
    pub fn element(self) -> Element {
        match self {
            SpeciesGroup::Na1 | SpeciesGroup::Na2 => Element::Na,
            SpeciesGroup::Ti => Element::Ti,
            SpeciesGroup::Mn => Element::Mn,
            SpeciesGroup::P => Element::P,
            SpeciesGroup::O => Element::O,
        }
    }
}

impl fmt::Display for SpeciesGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpeciesGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label() == s)
            .ok_or_else(|| format!("unknown species group '{}'", s))
    }
}

/// Parameters of the local-environment split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Search radius for the split test (Å)
    #[serde(default = "default_split_radius")]
    pub split_radius: f64,
    /// Element whose presence routes a Na site to `Na2`
    #[serde(default = "default_split_marker")]
    pub split_marker: Element,
}

fn default_split_radius() -> f64 {
    3.2
}

fn default_split_marker() -> Element {
    Element::P
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            split_radius: default_split_radius(),
            split_marker: default_split_marker(),
        }
    }
}

/// Site indices grouped by classification label
///
/// Built once per structure; membership never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGroups {
    groups: BTreeMap<SpeciesGroup, Vec<usize>>,
    /// Sites whose species is not a known [`Element`]
    dropped: usize,
}

impl SpeciesGroups {
    /// Site indices in `group` (empty when the structure has none)
    pub fn sites(&self, group: SpeciesGroup) -> &[usize] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group of site `index`, `None` for dropped sites
    pub fn group_of(&self, index: usize) -> Option<SpeciesGroup> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(&index))
            .map(|(group, _)| *group)
    }

    pub fn count(&self, group: SpeciesGroup) -> usize {
        self.sites(group).len()
    }

    /// Number of classified sites
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Classify every site of `structure`
pub fn classify(structure: &Structure, config: &ClassifierConfig) -> SpeciesGroups {
    let marker = config.split_marker.symbol();
    let mut groups: BTreeMap<SpeciesGroup, Vec<usize>> = BTreeMap::new();
    let mut dropped = 0;

    for (index, site) in structure.sites.iter().enumerate() {
        let group = match Element::from_symbol(&site.species) {
            Some(Element::Na) => {
                let has_marker = structure
                    .neighbors(index, config.split_radius)
                    .iter()
                    .any(|n| n.site.species == marker);
                if has_marker {
                    SpeciesGroup::Na2
                } else {
                    SpeciesGroup::Na1
                }
            }
            Some(Element::Ti) => SpeciesGroup::Ti,
            Some(Element::Mn) => SpeciesGroup::Mn,
            Some(Element::P) => SpeciesGroup::P,
            Some(Element::O) => SpeciesGroup::O,
            None => {
                dropped += 1;
                continue;
            }
        };
        groups.entry(group).or_default().push(index);
    }

    if dropped > 0 {
        log::debug!("Classifier dropped {} sites of unknown species", dropped);
    }

    SpeciesGroups { groups, dropped }
}
