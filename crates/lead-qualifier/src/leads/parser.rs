use crate::scoring::domain::{Lead, LeadId};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_leads<R: Read>(reader: R) -> Result<Vec<Lead>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut leads = Vec::new();

    for record in csv_reader.deserialize::<LeadRow>() {
        leads.push(record?.into_lead());
    }

    Ok(leads)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    linkedin_bio: Option<String>,
}

impl LeadRow {
    fn into_lead(self) -> Lead {
        Lead {
            id: Some(LeadId::generate()),
            name: self.name,
            role: self.role,
            company: self.company,
            industry: self.industry,
            location: self.location,
            linkedin_bio: self.linkedin_bio,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
