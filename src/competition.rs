use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Competition {
    Tests,
    T20s,
    Odis,
    Ipl,
}

impl Competition {
    pub const ALL: [Competition; 4] = [
        Competition::Tests,
        Competition::T20s,
        Competition::Odis,
        Competition::Ipl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Competition::Tests => "tests",
            Competition::T20s => "t20s",
            Competition::Odis => "odis",
            Competition::Ipl => "ipl",
        }
    }
}

impl FromStr for Competition {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tests" => Ok(Competition::Tests),
            "t20s" => Ok(Competition::T20s),
            "odis" => Ok(Competition::Odis),
            "ipl" => Ok(Competition::Ipl),
            _ => Err(StatsError::UnknownScope(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(StatsError::UnknownScope(s.to_string())),
        }
    }
}

/// A competition partition of the dataset, e.g. `tests_male`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompetitionType {
    pub competition: Competition,
    pub gender: Gender,
}

impl CompetitionType {
    pub fn new(competition: Competition, gender: Gender) -> Self {
        Self {
            competition,
            gender,
        }
    }

    pub fn all_for(gender: Gender) -> [CompetitionType; 4] {
        Competition::ALL.map(|c| CompetitionType::new(c, gender))
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompetitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.competition.as_str(), self.gender.as_str())
    }
}

impl FromStr for CompetitionType {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (competition, gender) = s
            .trim()
            .rsplit_once('_')
            .ok_or_else(|| StatsError::UnknownScope(s.to_string()))?;
        Ok(CompetitionType::new(competition.parse()?, gender.parse()?))
    }
}

/// Query scope: one partition or every partition of a gender (`all_male`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    One(CompetitionType),
    All(Gender),
}

impl Scope {
    pub fn competition_types(&self) -> Vec<CompetitionType> {
        match self {
            Scope::One(ct) => vec![*ct],
            Scope::All(gender) => CompetitionType::all_for(*gender).to_vec(),
        }
    }
}

impl FromStr for Scope {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(gender) = s.trim().strip_prefix("all_") {
            return Ok(Scope::All(gender.parse()?));
        }
        Ok(Scope::One(s.parse()?))
    }
}

/// One value per competition plus the cross-competition `all` bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCompetition<T> {
    pub all: T,
    pub tests: T,
    pub t20s: T,
    pub odis: T,
    pub ipl: T,
}

impl<T> PerCompetition<T> {
    pub fn get(&self, competition: Competition) -> &T {
        match competition {
            Competition::Tests => &self.tests,
            Competition::T20s => &self.t20s,
            Competition::Odis => &self.odis,
            Competition::Ipl => &self.ipl,
        }
    }

    pub fn get_mut(&mut self, competition: Competition) -> &mut T {
        match competition {
            Competition::Tests => &mut self.tests,
            Competition::T20s => &mut self.t20s,
            Competition::Odis => &mut self.odis,
            Competition::Ipl => &mut self.ipl,
        }
    }
}
