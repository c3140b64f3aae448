use crate::ids::{LabId, StreamId, TeacherId};
use crate::time::TimeSlot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nature d'une ressource ; sert de contexte d'affichage des conflits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Teacher,
    Lab,
    Stream,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Teacher => "teacher",
            ResourceKind::Lab => "lab",
            ResourceKind::Stream => "stream",
        })
    }
}

/// Référence typée vers une ressource de l'horaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Teacher(TeacherId),
    Lab(LabId),
    Stream(StreamId),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Teacher(_) => ResourceKind::Teacher,
            ResourceRef::Lab(_) => ResourceKind::Lab,
            ResourceRef::Stream(_) => ResourceKind::Stream,
        }
    }
}

/// Interface commune enseignant / local / groupe.
pub trait Resource {
    const KIND: ResourceKind;

    /// Clé naturelle : tri et upsert.
    fn natural_key(&self) -> String;
    fn display_name(&self) -> String;
    fn resource_ref(&self) -> ResourceRef;
}

/// Enseignant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub dept: String,
    /// Fraction de tâche libérée (0.0 = tâche complète).
    #[serde(default)]
    pub release: f64,
}

impl Teacher {
    pub fn new<F: Into<String>, L: Into<String>>(id: TeacherId, firstname: F, lastname: L) -> Self {
        Self {
            id,
            firstname: firstname.into(),
            lastname: lastname.into(),
            dept: String::new(),
            release: 0.0,
        }
    }
}

impl Resource for Teacher {
    const KIND: ResourceKind = ResourceKind::Teacher;

    fn natural_key(&self) -> String {
        format!("{} {}", self.lastname, self.firstname)
    }
    fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::Teacher(self.id)
    }
}

/// Local (laboratoire, salle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub id: LabId,
    pub number: String,
    #[serde(default)]
    pub descr: String,
    /// Plages où le local n'est pas disponible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<TimeSlot>,
}

impl Lab {
    pub fn new<N: Into<String>, D: Into<String>>(id: LabId, number: N, descr: D) -> Self {
        Self {
            id,
            number: number.into(),
            descr: descr.into(),
            unavailable: Vec::new(),
        }
    }

    pub fn add_unavailable(&mut self, mut slot: TimeSlot) {
        slot.set_movable(false);
        self.unavailable.push(slot);
    }

    pub fn clear_unavailable(&mut self) {
        self.unavailable.clear();
    }
}

impl Resource for Lab {
    const KIND: ResourceKind = ResourceKind::Lab;

    fn natural_key(&self) -> String {
        self.number.clone()
    }
    fn display_name(&self) -> String {
        if self.descr.is_empty() {
            self.number.clone()
        } else {
            format!("{}: {}", self.number, self.descr)
        }
    }
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::Lab(self.id)
    }
}

/// Groupe d'étudiants (cohorte)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub number: String,
    #[serde(default)]
    pub descr: String,
}

impl Stream {
    pub fn new<N: Into<String>, D: Into<String>>(id: StreamId, number: N, descr: D) -> Self {
        Self {
            id,
            number: number.into(),
            descr: descr.into(),
        }
    }
}

impl Resource for Stream {
    const KIND: ResourceKind = ResourceKind::Stream;

    fn natural_key(&self) -> String {
        self.number.clone()
    }
    fn display_name(&self) -> String {
        if self.descr.is_empty() {
            self.number.clone()
        } else {
            format!("{}: {}", self.number, self.descr)
        }
    }
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::Stream(self.id)
    }
}
