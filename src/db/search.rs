use super::*;

impl ProspectDb {
    /// Case-insensitive substring search across company name, contact names
    /// and emails, and pain-point text.
    ///
    /// An empty or whitespace-only query matches everything, returned in
    /// stored order. Contacts and pain points live in JSON columns, so
    /// matching happens over the decoded entities rather than in SQL.
    pub fn search(&self, query: &str) -> Result<Vec<Prospect>, StoreError> {
        let needle = query.trim().to_lowercase();
        let all = self.get_all()?;
        if needle.is_empty() {
            return Ok(all);
        }

        Ok(all
            .into_iter()
            .filter(|p| {
                p.company.to_lowercase().contains(&needle)
                    || p.contacts.iter().any(|c| {
                        c.name.to_lowercase().contains(&needle)
                            || c.email.to_lowercase().contains(&needle)
                    })
                    || p.pain_points
                        .iter()
                        .any(|point| point.to_lowercase().contains(&needle))
            })
            .collect())
    }
}
