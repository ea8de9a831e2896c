//! Fixed team and venue enumerations.
//!
//! Both are categorical features for the estimator. Serialized names are the
//! display names, which is also how the model artifact keys its weights.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A franchise side that can bat or bowl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "Chennai Super Kings")]
    ChennaiSuperKings,
    #[serde(rename = "Delhi Capitals")]
    DelhiCapitals,
    #[serde(rename = "Kolkata Knight Riders")]
    KolkataKnightRiders,
    #[serde(rename = "Mumbai Indians")]
    MumbaiIndians,
    #[serde(rename = "Punjab Kings")]
    PunjabKings,
    #[serde(rename = "Rajasthan Royals")]
    RajasthanRoyals,
    #[serde(rename = "Royal Challengers Bangalore")]
    RoyalChallengersBangalore,
    #[serde(rename = "Sunrisers Hyderabad")]
    SunrisersHyderabad,
}

impl Team {
    /// All sides, sorted by display name.
    pub const ALL: [Team; 8] = [
        Team::ChennaiSuperKings,
        Team::DelhiCapitals,
        Team::KolkataKnightRiders,
        Team::MumbaiIndians,
        Team::PunjabKings,
        Team::RajasthanRoyals,
        Team::RoyalChallengersBangalore,
        Team::SunrisersHyderabad,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Team::ChennaiSuperKings => "Chennai Super Kings",
            Team::DelhiCapitals => "Delhi Capitals",
            Team::KolkataKnightRiders => "Kolkata Knight Riders",
            Team::MumbaiIndians => "Mumbai Indians",
            Team::PunjabKings => "Punjab Kings",
            Team::RajasthanRoyals => "Rajasthan Royals",
            Team::RoyalChallengersBangalore => "Royal Challengers Bangalore",
            Team::SunrisersHyderabad => "Sunrisers Hyderabad",
        }
    }

    /// Case-insensitive lookup by display name or common abbreviation.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase();
        Team::ALL.into_iter().find(|t| {
            t.name().to_lowercase() == needle || t.abbreviation().to_lowercase() == needle
        })
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Team::ChennaiSuperKings => "CSK",
            Team::DelhiCapitals => "DC",
            Team::KolkataKnightRiders => "KKR",
            Team::MumbaiIndians => "MI",
            Team::PunjabKings => "PBKS",
            Team::RajasthanRoyals => "RR",
            Team::RoyalChallengersBangalore => "RCB",
            Team::SunrisersHyderabad => "SRH",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host city of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    Ahmedabad,
    Bengaluru,
    Chandigarh,
    Chennai,
    Cuttack,
    Delhi,
    Dharamsala,
    Guwahati,
    Hyderabad,
    Indore,
    Jaipur,
    Kolkata,
    Lucknow,
    Mohali,
    Mullanpur,
    Mumbai,
    Nagpur,
    Pune,
    Raipur,
    Ranchi,
    Visakhapatnam,
}

impl Venue {
    /// All venues, sorted by name.
    pub const ALL: [Venue; 21] = [
        Venue::Ahmedabad,
        Venue::Bengaluru,
        Venue::Chandigarh,
        Venue::Chennai,
        Venue::Cuttack,
        Venue::Delhi,
        Venue::Dharamsala,
        Venue::Guwahati,
        Venue::Hyderabad,
        Venue::Indore,
        Venue::Jaipur,
        Venue::Kolkata,
        Venue::Lucknow,
        Venue::Mohali,
        Venue::Mullanpur,
        Venue::Mumbai,
        Venue::Nagpur,
        Venue::Pune,
        Venue::Raipur,
        Venue::Ranchi,
        Venue::Visakhapatnam,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Venue::Ahmedabad => "Ahmedabad",
            Venue::Bengaluru => "Bengaluru",
            Venue::Chandigarh => "Chandigarh",
            Venue::Chennai => "Chennai",
            Venue::Cuttack => "Cuttack",
            Venue::Delhi => "Delhi",
            Venue::Dharamsala => "Dharamsala",
            Venue::Guwahati => "Guwahati",
            Venue::Hyderabad => "Hyderabad",
            Venue::Indore => "Indore",
            Venue::Jaipur => "Jaipur",
            Venue::Kolkata => "Kolkata",
            Venue::Lucknow => "Lucknow",
            Venue::Mohali => "Mohali",
            Venue::Mullanpur => "Mullanpur",
            Venue::Mumbai => "Mumbai",
            Venue::Nagpur => "Nagpur",
            Venue::Pune => "Pune",
            Venue::Raipur => "Raipur",
            Venue::Ranchi => "Ranchi",
            Venue::Visakhapatnam => "Visakhapatnam",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
