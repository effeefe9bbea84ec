//! Process-wide jurisdiction registry.
//!
//! One entry per supported jurisdiction, loaded once. Reporter-style
//! citation abbreviations are set only where the source system actually
//! cites with one; everything else formats with its uppercased postal code.

use crate::error::{ConvertError, Result};
use crate::types::{Jurisdiction, JurisdictionType};

/// All registered jurisdictions: federal plus the covered states.
static REGISTRY: &[Jurisdiction] = &[
    Jurisdiction {
        id: "us",
        name: "United States",
        kind: JurisdictionType::Federal,
        base_url: Some("https://uscode.house.gov"),
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-al",
        name: "Alabama",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-az",
        name: "Arizona",
        kind: JurisdictionType::State,
        base_url: Some("https://www.azleg.gov"),
        citation_abbrev: Some("Ariz."),
    },
    Jurisdiction {
        id: "us-ca",
        name: "California",
        kind: JurisdictionType::State,
        base_url: Some("https://leginfo.legislature.ca.gov"),
        citation_abbrev: Some("Cal."),
    },
    Jurisdiction {
        id: "us-co",
        name: "Colorado",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Colo."),
    },
    Jurisdiction {
        id: "us-ct",
        name: "Connecticut",
        kind: JurisdictionType::State,
        base_url: Some("https://www.cga.ct.gov"),
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-fl",
        name: "Florida",
        kind: JurisdictionType::State,
        base_url: Some("http://www.leg.state.fl.us"),
        citation_abbrev: Some("Fla."),
    },
    Jurisdiction {
        id: "us-ga",
        name: "Georgia",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Ga."),
    },
    Jurisdiction {
        id: "us-il",
        name: "Illinois",
        kind: JurisdictionType::State,
        base_url: Some("https://www.ilga.gov"),
        citation_abbrev: Some("Ill."),
    },
    Jurisdiction {
        id: "us-in",
        name: "Indiana",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Ind."),
    },
    Jurisdiction {
        id: "us-ky",
        name: "Kentucky",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-la",
        name: "Louisiana",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-ma",
        name: "Massachusetts",
        kind: JurisdictionType::State,
        base_url: Some("https://malegislature.gov"),
        citation_abbrev: Some("Mass."),
    },
    Jurisdiction {
        id: "us-md",
        name: "Maryland",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Md."),
    },
    Jurisdiction {
        id: "us-mi",
        name: "Michigan",
        kind: JurisdictionType::State,
        base_url: Some("https://www.legislature.mi.gov"),
        citation_abbrev: Some("Mich."),
    },
    Jurisdiction {
        id: "us-mn",
        name: "Minnesota",
        kind: JurisdictionType::State,
        base_url: Some("https://www.revisor.mn.gov"),
        citation_abbrev: Some("Minn."),
    },
    Jurisdiction {
        id: "us-mo",
        name: "Missouri",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Mo."),
    },
    Jurisdiction {
        id: "us-nc",
        name: "North Carolina",
        kind: JurisdictionType::State,
        base_url: Some("https://www.ncleg.gov"),
        citation_abbrev: Some("N.C."),
    },
    Jurisdiction {
        id: "us-nj",
        name: "New Jersey",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("N.J."),
    },
    Jurisdiction {
        id: "us-ny",
        name: "New York",
        kind: JurisdictionType::State,
        base_url: Some("https://www.nysenate.gov"),
        citation_abbrev: Some("N.Y."),
    },
    Jurisdiction {
        id: "us-oh",
        name: "Ohio",
        kind: JurisdictionType::State,
        base_url: Some("https://codes.ohio.gov"),
        citation_abbrev: Some("Ohio"),
    },
    Jurisdiction {
        id: "us-ok",
        name: "Oklahoma",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-or",
        name: "Oregon",
        kind: JurisdictionType::State,
        base_url: Some("https://www.oregonlegislature.gov"),
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-pa",
        name: "Pennsylvania",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Pa."),
    },
    Jurisdiction {
        id: "us-sc",
        name: "South Carolina",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-tn",
        name: "Tennessee",
        kind: JurisdictionType::State,
        base_url: None,
        citation_abbrev: Some("Tenn."),
    },
    Jurisdiction {
        id: "us-tx",
        name: "Texas",
        kind: JurisdictionType::State,
        base_url: Some("https://statutes.capitol.texas.gov"),
        citation_abbrev: Some("Tex."),
    },
    Jurisdiction {
        id: "us-ut",
        name: "Utah",
        kind: JurisdictionType::State,
        base_url: Some("https://le.utah.gov"),
        citation_abbrev: None,
    },
    Jurisdiction {
        id: "us-va",
        name: "Virginia",
        kind: JurisdictionType::State,
        base_url: Some("https://law.lis.virginia.gov"),
        citation_abbrev: Some("Va."),
    },
    Jurisdiction {
        id: "us-wa",
        name: "Washington",
        kind: JurisdictionType::State,
        base_url: Some("https://app.leg.wa.gov"),
        citation_abbrev: Some("Wash."),
    },
    Jurisdiction {
        id: "us-wi",
        name: "Wisconsin",
        kind: JurisdictionType::State,
        base_url: Some("https://docs.legis.wisconsin.gov"),
        citation_abbrev: Some("Wis."),
    },
];

/// All registered jurisdictions.
#[must_use]
pub fn all() -> &'static [Jurisdiction] {
    REGISTRY
}

/// Look up a jurisdiction by id.
#[must_use]
pub fn lookup(id: &str) -> Option<&'static Jurisdiction> {
    REGISTRY.iter().find(|j| j.id == id)
}

/// Look up a jurisdiction by id, failing on unregistered ids.
///
/// An unregistered jurisdiction is a programmer error (a converter was wired
/// to a jurisdiction missing from the registry) and raises to the caller.
pub fn get(id: &str) -> Result<&'static Jurisdiction> {
    lookup(id).ok_or_else(|| ConvertError::UnknownJurisdiction(id.to_string()))
}

/// Find a jurisdiction by its citation label ("Cal.", "OH", ...).
#[must_use]
pub fn by_citation_label(label: &str) -> Option<&'static Jurisdiction> {
    all().iter().find(|j| j.citation_label() == label)
}
