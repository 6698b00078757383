//! Fictional value pools and exhaust-then-reshuffle bags

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoolKind {
    GivenName,
    FamilyName,
    StreetName,
    City,
    County,
    State,
    Country,
    /// City, county, state and country pools combined
    Locality,
    FacilityType,
    OrganizationType,
    Scope,
    Conjunction,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PoolKind::GivenName => "given_name",
            PoolKind::FamilyName => "family_name",
            PoolKind::StreetName => "street_name",
            PoolKind::City => "city",
            PoolKind::County => "county",
            PoolKind::State => "state",
            PoolKind::Country => "country",
            PoolKind::Locality => "locality",
            PoolKind::FacilityType => "facility_type",
            PoolKind::OrganizationType => "organization_type",
            PoolKind::Scope => "scope",
            PoolKind::Conjunction => "conjunction",
        };
        f.write_str(label)
    }
}

const GIVEN_NAMES: &[&str] = &[
    "Alder", "Briony", "Caspian", "Delphine", "Emrys", "Fenna", "Gideon", "Hollis", "Isolde",
    "Jorah", "Kestrel", "Linnea", "Marlow", "Nerys", "Orrin", "Perrin", "Quilla", "Rowan",
    "Saoirse", "Tamsin", "Ulric", "Vesper", "Wren", "Xanthe", "Yarrow", "Zephyr", "Ansel",
    "Bexley", "Corin", "Dashiell",
];

const FAMILY_NAMES: &[&str] = &[
    "Ashgrove", "Blackthorn", "Coldwater", "Dunmere", "Eastwick", "Fallowby", "Greywell",
    "Hartfield", "Ironwood", "Juniperly", "Kettleby", "Larkspur", "Millbrook", "Northcott",
    "Oakhurst", "Pennywhistle", "Quarrington", "Rookwood", "Stonebridge", "Thistledown",
    "Underhill", "Vantwell", "Whitlock", "Yellowley", "Brackenridge", "Copperfield",
    "Dovecote", "Elderbank", "Foxworth", "Gallowmere",
];

const STREET_NAMES: &[&str] = &[
    "Amberleaf", "Birchwhistle", "Cloverdale", "Driftwood", "Elmsworth", "Fernhollow",
    "Glenmoor", "Hazelnook", "Ivybrook", "Juniper Ridge", "Kingfisher", "Lanternlight",
    "Meadowlark", "Nettlefield", "Orchard Bend", "Pinecrest", "Quailrun", "Ravenscroft",
    "Saffron Hill", "Tanglewood", "Upland Fen", "Violet Glen", "Willowmere", "Yewtree",
];

const CITIES: &[&str] = &[
    "Ashbourne Falls", "Brindlewick", "Cedar Hollow", "Dunhaven", "Elmstead", "Foxmoor",
    "Glimmerdale", "Harrowgate Springs", "Ivory Bluff", "Juniper Flats", "Kettering Ridge",
    "Lowmarsh", "Maplestone", "Northbrook Landing", "Oakmere", "Pebblecreek", "Quillon",
    "Redfern", "Silverlake Crossing", "Thornbury", "Umberton", "Valewood", "Westerhold",
];

const COUNTIES: &[&str] = &[
    "Alderbrook County", "Bramblewood County", "Carrow County", "Denholm County",
    "Everfield County", "Fairmoor County", "Greystone County", "Holloway County",
    "Inglenook County", "Larchmont County", "Mistvale County", "Stormreach County",
];

const STATES: &[&str] = &[
    "Avalon", "Borealis", "Cascadia", "Dunmore", "Eldoria", "Fennland", "Glenshire",
    "Highmarch", "Islemont", "Lowland", "Meridia", "Northmark", "Solana", "Westvale",
];

const COUNTRIES: &[&str] = &[
    "Arcadia", "Brevonia", "Caldoria", "Drakmoor", "Estoria", "Florin", "Genovia",
    "Illyria", "Latveria", "Marivel", "Norland", "Ruritania",
];

const FACILITY_TYPES: &[&str] = &[
    "Hospital",
    "Clinic",
    "Health Center",
    "Medical Center",
    "Urgent Care",
    "Laboratory",
    "Pharmacy",
    "Research Institute",
    "Health System",
];

const ORGANIZATION_TYPES: &[&str] = &["University", "College", "School", "Academy", "Institute"];

const SCOPES: &[&str] = &["Neighborhood", "Neighbourhood", "Regional"];

const CONJUNCTIONS: &[&str] = &["and", "&", "+"];

static LOCALITIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    CITIES
        .iter()
        .chain(COUNTIES)
        .chain(STATES)
        .chain(COUNTRIES)
        .copied()
        .collect()
});

/// All values of one pool
pub fn values(kind: PoolKind) -> &'static [&'static str] {
    match kind {
        PoolKind::GivenName => GIVEN_NAMES,
        PoolKind::FamilyName => FAMILY_NAMES,
        PoolKind::StreetName => STREET_NAMES,
        PoolKind::City => CITIES,
        PoolKind::County => COUNTIES,
        PoolKind::State => STATES,
        PoolKind::Country => COUNTRIES,
        PoolKind::Locality => LOCALITIES.as_slice(),
        PoolKind::FacilityType => FACILITY_TYPES,
        PoolKind::OrganizationType => ORGANIZATION_TYPES,
        PoolKind::Scope => SCOPES,
        PoolKind::Conjunction => CONJUNCTIONS,
    }
}

/// Per-pool bags drawn without replacement, refilled and reshuffled once empty
#[derive(Debug, Default, Clone)]
pub struct PoolBags {
    bags: HashMap<PoolKind, Vec<&'static str>>,
}

impl PoolBags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, kind: PoolKind, rng: &mut R) -> &'static str {
        let bag = self.bags.entry(kind).or_default();
        if bag.is_empty() {
            bag.extend_from_slice(values(kind));
            bag.shuffle(rng);
        }
        bag.pop().unwrap_or_default()
    }

    /// Values left before the next reshuffle
    pub fn remaining(&self, kind: PoolKind) -> usize {
        self.bags.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_bag_exhausts_before_repeating() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bags = PoolBags::new();
        let size = values(PoolKind::State).len();

        let first: HashSet<_> = (0..size).map(|_| bags.draw(PoolKind::State, &mut rng)).collect();
        assert_eq!(first.len(), size);
        assert_eq!(bags.remaining(PoolKind::State), 0);

        bags.draw(PoolKind::State, &mut rng);
        assert_eq!(bags.remaining(PoolKind::State), size - 1);
    }

    #[test]
    fn test_locality_combines_place_pools() {
        let expected = CITIES.len() + COUNTIES.len() + STATES.len() + COUNTRIES.len();
        assert_eq!(values(PoolKind::Locality).len(), expected);
    }

    #[test]
    fn test_pools_have_no_periods() {
        for kind in [PoolKind::GivenName, PoolKind::StreetName, PoolKind::Locality] {
            assert!(values(kind).iter().all(|v| !v.contains('.')), "{kind}");
        }
    }
}
