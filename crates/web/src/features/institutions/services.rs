use serde::Deserialize;

/// Client for the Hipo university directory, used to populate the
/// institution picker. Nothing from it is persisted; every lookup goes to
/// the upstream API.
#[derive(Clone)]
pub struct InstitutionDirectory {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct InstitutionRecord {
    name: String,
}

impl InstitutionDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Institution names for one country, sorted and deduplicated.
    pub async fn names_for_country(&self, country: &str) -> Result<Vec<String>, reqwest::Error> {
        let records: Vec<InstitutionRecord> = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("country", country)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut names: Vec<String> = records.into_iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directory_records() {
        let body = r#"[
            {"name": "University of Michigan", "country": "United States", "domains": ["umich.edu"]},
            {"name": "Ohio State University", "country": "United States", "domains": ["osu.edu"]}
        ]"#;

        let records: Vec<InstitutionRecord> = serde_json::from_str(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "University of Michigan");
    }
}
