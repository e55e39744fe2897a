//! PostgREST query construction: filters, ordering and range pagination.

use balcao_models::PageQuery;

/// Builder for the query-string pairs of a PostgREST request.
///
/// Rendering happens once in [`Query::to_pairs`]; the client passes the
/// pairs to reqwest, which handles percent-encoding.
#[derive(Debug, Clone, Default)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict returned columns (`select=col1,col2`).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Equality filter (`col=eq.value`).
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// Case-insensitive substring match (`col=ilike.*term*`).
    pub fn search(mut self, column: impl Into<String>, term: &str) -> Self {
        // PostgREST reserves ',' and '.' inside filter values; strip them
        // from free-text search terms instead of attempting to quote.
        let cleaned: String = term.chars().filter(|c| *c != ',' && *c != '.').collect();
        self.filters.push((column.into(), format!("ilike.*{}*", cleaned)));
        self
    }

    /// Membership filter (`col=in.(a,b,c)`).
    pub fn in_list<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.into(), format!("in.({})", joined)));
        self
    }

    /// Array-contains filter for array columns (`col=cs.{v}`).
    pub fn contains(mut self, column: impl Into<String>, value: &str) -> Self {
        self.filters.push((column.into(), format!("cs.{{{}}}", value)));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(format!("{column}.asc"));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(format!("{column}.desc"));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Apply offset/limit from normalized page parameters.
    pub fn paginate(self, page: PageQuery) -> Self {
        let page = page.normalized();
        self.limit(page.limit()).offset(page.offset())
    }

    /// Render as query-string pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 4);
        if let Some(ref select) = self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        for (column, filter) in &self.filters {
            pairs.push((column.clone(), filter.clone()));
        }
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(pairs: &[(String, String)], key: &str) -> Option<String> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn eq_filter_renders_operator_prefix() {
        let pairs = Query::new().eq("cidade", "Itajuba").to_pairs();
        assert_eq!(pair(&pairs, "cidade").as_deref(), Some("eq.Itajuba"));
    }

    #[test]
    fn search_wraps_term_and_strips_reserved_chars() {
        let pairs = Query::new().search("titulo", "vendedor, sr.").to_pairs();
        assert_eq!(pair(&pairs, "titulo").as_deref(), Some("ilike.*vendedor sr*"));
    }

    #[test]
    fn pagination_maps_page_to_offset_limit() {
        let page: PageQuery = serde_json::from_value(serde_json::json!({
            "page": 3, "per_page": 25
        }))
        .unwrap();
        let pairs = Query::new().paginate(page).to_pairs();
        assert_eq!(pair(&pairs, "limit").as_deref(), Some("25"));
        assert_eq!(pair(&pairs, "offset").as_deref(), Some("50"));
    }

    #[test]
    fn orders_join_in_declaration_order() {
        let pairs = Query::new()
            .order_desc("destaque")
            .order_desc("criado_em")
            .to_pairs();
        assert_eq!(pair(&pairs, "order").as_deref(), Some("destaque.desc,criado_em.desc"));
    }

    #[test]
    fn in_list_and_contains_render() {
        let pairs = Query::new()
            .in_list("status", ["aberta", "encerrada"])
            .contains("tags", "empregos")
            .to_pairs();
        assert_eq!(pair(&pairs, "status").as_deref(), Some("in.(aberta,encerrada)"));
        assert_eq!(pair(&pairs, "tags").as_deref(), Some("cs.{empregos}"));
    }
}
