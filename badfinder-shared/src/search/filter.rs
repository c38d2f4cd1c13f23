/// Circle filter fragments
///
/// Search criteria are independent and optional; each one that is supplied
/// contributes a single WHERE fragment, and the fragments are combined with
/// logical AND. The free-text criterion is itself an OR over name and
/// description, kept inside one parenthesized fragment so the OR can never
/// leak into the outer AND.
///
/// The recruiting constraint is unconditional: non-recruiting circles are
/// invisible to search no matter what else is asked for.
///
/// The builder is pure — it produces SQL text with numbered placeholders and
/// the bind values in matching order — so the AND/OR grouping is testable
/// without a database.

/// Optional, independent circle search criteria
#[derive(Debug, Clone, Default)]
pub struct CircleFilter {
    /// Free-text term matched case-insensitively against name OR description
    pub search: Option<String>,

    /// Exact prefecture match
    pub prefecture: Option<String>,

    /// Skill level tag the circle's set must contain
    pub skill_level: Option<String>,
}

/// Rendered WHERE clause plus its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSql {
    /// Full clause, starting with `WHERE `
    pub where_clause: String,

    /// String bind values for `$1..$n`
    pub binds: Vec<String>,
}

impl CircleFilter {
    /// The free-text term, if one was meaningfully supplied
    ///
    /// Empty and whitespace-only terms impose no constraint.
    pub fn search_term(&self) -> Option<&str> {
        normalized(&self.search)
    }

    /// Renders the filter as a WHERE clause with placeholders from `$1`
    ///
    /// Fragment order: free-text, prefecture, skill level, recruiting. The
    /// free-text fragment references its single bind twice — once for the
    /// name branch, once for the description branch of the OR.
    pub fn to_sql(&self) -> FilterSql {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(term) = self.search_term() {
            binds.push(term.to_string());
            let n = binds.len();
            clauses.push(format!(
                "(name ILIKE '%' || ${n} || '%' OR description ILIKE '%' || ${n} || '%')"
            ));
        }

        if let Some(prefecture) = normalized(&self.prefecture) {
            binds.push(prefecture.to_string());
            clauses.push(format!("prefecture = ${}", binds.len()));
        }

        if let Some(skill) = normalized(&self.skill_level) {
            binds.push(skill.to_string());
            clauses.push(format!("${} = ANY(skill_level)", binds.len()));
        }

        clauses.push("is_recruiting = TRUE".to_string());

        FilterSql {
            where_clause: format!("WHERE {}", clauses.join(" AND ")),
            binds,
        }
    }
}

/// Treats empty and whitespace-only values as absent
fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_keeps_only_recruiting() {
        let sql = CircleFilter::default().to_sql();

        assert_eq!(sql.where_clause, "WHERE is_recruiting = TRUE");
        assert!(sql.binds.is_empty());
    }

    #[test]
    fn test_search_groups_or_inside_one_fragment() {
        let sql = CircleFilter {
            search: Some("バドミントン".to_string()),
            ..Default::default()
        }
        .to_sql();

        assert_eq!(
            sql.where_clause,
            "WHERE (name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%') \
             AND is_recruiting = TRUE"
        );
        assert_eq!(sql.binds, vec!["バドミントン".to_string()]);
    }

    #[test]
    fn test_all_filters_compose_with_and() {
        let sql = CircleFilter {
            search: Some("club".to_string()),
            prefecture: Some("東京都".to_string()),
            skill_level: Some("初心者".to_string()),
        }
        .to_sql();

        assert_eq!(
            sql.where_clause,
            "WHERE (name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%') \
             AND prefecture = $2 AND $3 = ANY(skill_level) AND is_recruiting = TRUE"
        );
        assert_eq!(
            sql.binds,
            vec![
                "club".to_string(),
                "東京都".to_string(),
                "初心者".to_string()
            ]
        );
    }

    #[test]
    fn test_placeholders_renumber_without_search() {
        let sql = CircleFilter {
            prefecture: Some("大阪府".to_string()),
            skill_level: Some("上級者".to_string()),
            ..Default::default()
        }
        .to_sql();

        assert_eq!(
            sql.where_clause,
            "WHERE prefecture = $1 AND $2 = ANY(skill_level) AND is_recruiting = TRUE"
        );
        assert_eq!(sql.binds.len(), 2);
    }

    #[test]
    fn test_blank_criteria_impose_no_constraint() {
        let sql = CircleFilter {
            search: Some("   ".to_string()),
            prefecture: Some(String::new()),
            skill_level: None,
        }
        .to_sql();

        assert_eq!(sql.where_clause, "WHERE is_recruiting = TRUE");
        assert!(sql.binds.is_empty());
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let filter = CircleFilter {
            search: Some("  club  ".to_string()),
            ..Default::default()
        };

        assert_eq!(filter.search_term(), Some("club"));
        assert_eq!(filter.to_sql().binds, vec!["club".to_string()]);
    }
}
