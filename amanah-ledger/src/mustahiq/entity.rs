use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

/// The eight groups entitled to receive zakat.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
#[sqlx(type_name = "asnaf", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Asnaf {
    Fakir,
    Miskin,
    Amil,
    Mualaf,
    Riqab,
    Gharim,
    Fisabilillah,
    IbnuSabil,
}

/// A registered zakat recipient.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mustahiq {
    pub id: MustahiqId,
    pub owner_id: OwnerId,
    pub name: String,
    pub asnaf: Asnaf,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewMustahiq {
    #[builder(setter(into))]
    pub(crate) name: String,
    pub(crate) asnaf: Asnaf,
    #[builder(setter(into, strip_option), default)]
    pub(crate) address: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub(crate) phone: Option<String>,
    #[builder(setter(into), default)]
    pub(crate) notes: String,
}

impl NewMustahiq {
    pub fn builder() -> NewMustahiqBuilder {
        NewMustahiqBuilder::default()
    }
}

impl NewMustahiqBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Partial update of a recipient. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MustahiqUpdate {
    pub name: Option<String>,
    pub asnaf: Option<Asnaf>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asnaf_parses_snake_case() {
        assert_eq!("ibnu_sabil".parse::<Asnaf>().unwrap(), Asnaf::IbnuSabil);
        assert_eq!(Asnaf::Fisabilillah.to_string(), "fisabilillah");
        assert!("dhuafa".parse::<Asnaf>().is_err());
    }

    #[test]
    fn recipient_requires_a_name() {
        assert!(NewMustahiq::builder()
            .name("")
            .asnaf(Asnaf::Miskin)
            .build()
            .is_err());
        let mustahiq = NewMustahiq::builder()
            .name("Ibu Siti")
            .asnaf(Asnaf::Fakir)
            .build()
            .unwrap();
        assert_eq!(mustahiq.notes, "");
    }
}
