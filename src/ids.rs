use serde::{Deserialize, Serialize};

/// Déclare un identifiant fort autour d'un `u32`.
///
/// Les identifiants sont attribués par un [`IdAllocator`] possédé par le
/// `Schedule` ; aucun compteur global.
macro_rules! define_id_type {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub fn new(value: u32) -> Self {
                Self(value)
            }
            pub fn value(&self) -> u32 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }
    };
}

define_id_type!(BlockId, "B");
define_id_type!(SectionId, "S");
define_id_type!(CourseId, "C");
define_id_type!(TeacherId, "T");
define_id_type!(LabId, "L");
define_id_type!(StreamId, "G");

/// Distributeur d'identifiants (un seul compteur par horaire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prochain identifiant, converti dans le type demandé.
    pub fn allocate<T: From<u32>>(&mut self) -> T {
        self.next += 1;
        T::from(self.next)
    }
}
