//! Static reference data for the affixes a mod can roll.

use serde::Serialize;

use crate::{Error, AFFIX_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixCategory {
    Damage,
    Defense,
    Utility,
}

impl AffixCategory {
    pub const ALL: [AffixCategory; 3] = [
        AffixCategory::Damage,
        AffixCategory::Defense,
        AffixCategory::Utility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AffixCategory::Damage => "damage",
            AffixCategory::Defense => "defense",
            AffixCategory::Utility => "utility",
        }
    }
}

impl std::str::FromStr for AffixCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        AffixCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCategory(s.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Affix {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AffixCategory,
}

impl Affix {
    const fn new(
        id: u8,
        name: &'static str,
        description: &'static str,
        category: AffixCategory,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
        }
    }
}

use AffixCategory::{Damage, Defense, Utility};

// sorted by id, ids start at 1 with no gaps
static AFFIXES: [Affix; AFFIX_COUNT as usize] = [
    Affix::new(1, "Status DMG", "Increases damage dealt by status effects", Damage),
    Affix::new(2, "Magazine Capacity", "Increases weapon magazine capacity", Utility),
    Affix::new(3, "Reload Speed", "Increases reload speed", Utility),
    Affix::new(4, "DMG vs Normal", "Extra damage against normal enemies", Damage),
    Affix::new(5, "DMG vs Elite", "Extra damage against elite enemies", Damage),
    Affix::new(6, "DMG vs Great One", "Extra damage against Great Ones", Damage),
    Affix::new(7, "Max HP", "Increases maximum HP", Defense),
    Affix::new(8, "Head DMG Reduction", "Reduces damage taken to the head", Defense),
    Affix::new(9, "Gun DMG Reduction", "Reduces damage taken from firearms", Defense),
    Affix::new(10, "Status DMG Reduction", "Reduces damage taken from status effects", Defense),
];

pub fn all() -> &'static [Affix] {
    &AFFIXES
}

pub fn by_id(id: u8) -> Option<&'static Affix> {
    let idx = id.checked_sub(1)?;
    AFFIXES.get(idx as usize)
}

pub fn by_category(category: AffixCategory) -> impl Iterator<Item = &'static Affix> {
    AFFIXES
        .iter()
        .filter(move |affix| affix.category == category)
}

/// Display names for the given ids, unknown ids are skipped
pub fn names(ids: &[u8]) -> Vec<&'static str> {
    ids.iter()
        .filter_map(|&id| by_id(id))
        .map(|affix| affix.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn ids_are_contiguous_from_one() {
        for (idx, affix) in all().iter().enumerate() {
            pretty_assertions::assert_eq!(affix.id as usize, idx + 1);
        }
    }

    #[test_case(1 => Some("Status DMG"))]
    #[test_case(10 => Some("Status DMG Reduction"))]
    #[test_case(0 => None)]
    #[test_case(11 => None)]
    fn lookup_by_id(id: u8) -> Option<&'static str> {
        by_id(id).map(|affix| affix.name)
    }

    #[test_case(Damage => vec![1, 4, 5, 6])]
    #[test_case(Defense => vec![7, 8, 9, 10])]
    #[test_case(Utility => vec![2, 3])]
    fn lookup_by_category(category: AffixCategory) -> Vec<u8> {
        by_category(category).map(|affix| affix.id).collect()
    }

    #[test_case("damage" => Ok(Damage))]
    #[test_case("Defense" => Ok(Defense))]
    #[test_case("UTILITY" => Ok(Utility))]
    #[test_case("healing" => Err(Error::UnknownCategory("healing".into())))]
    fn parse_category(input: &str) -> Result<AffixCategory, Error> {
        input.parse()
    }

    #[test]
    fn names_skip_unknown_ids() {
        pretty_assertions::assert_eq!(names(&[1, 42, 7]), vec!["Status DMG", "Max HP"]);
    }
}
