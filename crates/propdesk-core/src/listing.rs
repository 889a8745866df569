//! Generic list-query pipeline shared by every resource module.
//!
//! Raw query parameters become a [`QuerySpec`] (filter, search, sort,
//! projection, pagination), which is validated against a [`Collection`]
//! descriptor and rendered onto [`sqlx::QueryBuilder`]s. The page fetch and
//! both counts run concurrently; an optional per-repository enrichment hook
//! runs over the returned page.
//!
//! Identifiers in the generated SQL come exclusively from the static
//! [`Collection`] descriptor. User input is only ever bound as parameters.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::AppError;

/// Query keys consumed by the pipeline itself; everything else is treated
/// as a candidate filter.
const RESERVED_KEYS: [&str; 11] = [
    "page",
    "sort",
    "limit",
    "fields",
    "all",
    "search",
    "Search",
    "start_date",
    "startDate",
    "end_date",
    "endDate",
];

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 100;

/// How a filterable column is typed, which controls value parsing and the
/// bind used in generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
    Uuid,
    Timestamp,
}

/// One externally filterable/sortable field: its API name, the SQL column
/// expression it maps to, and its kind.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind }
    }
}

/// Static descriptor of one listable collection. `select` is the full base
/// SELECT (joins already attached) without a WHERE clause; `count_from` is
/// the FROM clause the counts run against. Collections should list
/// `created_at` among `filterable` so the default sort resolves.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub resource: &'static str,
    pub select: &'static str,
    pub count_from: &'static str,
    /// Predicate excluding soft-deleted rows, applied to every query
    /// including the unfiltered total.
    pub soft_delete: Option<&'static str>,
    pub filterable: &'static [FilterField],
    /// Column expressions eligible for keyword search (cast to text).
    pub searchable: &'static [&'static str],
}

impl Collection {
    fn field(&self, name: &str) -> Option<&FilterField> {
        self.filterable.iter().find(|f| f.name == name)
    }
}

/// Repository contract consumed by [`list_documents`]: the collection
/// descriptor plus an optional post-query enrichment hook the pipeline
/// always invokes on the result page.
pub trait Repository: Send + Sync {
    fn collection(&self) -> &Collection;

    fn enrich<'a>(
        &'a self,
        db: &'a PgPool,
        rows: Vec<Value>,
    ) -> BoxFuture<'a, Result<Vec<Value>, AppError>> {
        let _ = db;
        Box::pin(async move { Ok(rows) })
    }
}

/// Comparison operators accepted in `field[op]=value` filter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Op {
    fn from_suffix(s: &str) -> Option<Op> {
        match s {
            "ne" => Some(Op::Ne),
            "gt" => Some(Op::Gt),
            "gte" => Some(Op::Gte),
            "lt" => Some(Op::Lt),
            "lte" => Some(Op::Lte),
            "in" => Some(Op::In),
            _ => None,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            Op::Eq => " = ",
            Op::Ne => " <> ",
            Op::Gt => " > ",
            Op::Gte => " >= ",
            Op::Lt => " < ",
            Op::Lte => " <= ",
            Op::In => " = ANY(",
        }
    }
}

/// A raw, not-yet-validated filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// true = inclusion list, false = exclusion list.
    pub include: bool,
    pub fields: Vec<String>,
}

/// Parsed shape of a list request.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub conditions: Vec<Condition>,
    pub search: Option<String>,
    pub sort: Vec<SortKey>,
    pub fields: Option<Projection>,
    pub page: i64,
    pub limit: i64,
    pub all: bool,
}

impl QuerySpec {
    /// Build a spec from raw query parameters. Malformed pagination input
    /// falls back to defaults; empty values are dropped; a
    /// `start_date`/`end_date` pair synthesizes a `date` range that takes
    /// precedence over any literal `date` filter.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let page = params
            .get("page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);

        let limit = params
            .get("limit")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT);

        let all = params.get("all").map(|v| v == "true").unwrap_or(false);

        let search = params
            .get("search")
            .or_else(|| params.get("Search"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let sort = params
            .get("sort")
            .map(|spec| parse_sort(spec))
            .unwrap_or_default();

        let fields = params.get("fields").and_then(|spec| parse_projection(spec));

        let mut conditions: Vec<Condition> = Vec::new();
        for (key, value) in params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let (field, op) = parse_filter_key(key);
            conditions.push(Condition {
                field,
                op,
                value: value.to_string(),
            });
        }

        let start_date = params
            .get("start_date")
            .or_else(|| params.get("startDate"))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());
        let end_date = params
            .get("end_date")
            .or_else(|| params.get("endDate"))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());
        if start_date.is_some() || end_date.is_some() {
            conditions.retain(|c| c.field != "date");
            if let Some(start) = start_date {
                conditions.push(Condition {
                    field: "date".to_string(),
                    op: Op::Gte,
                    value: start.to_string(),
                });
            }
            if let Some(end) = end_date {
                conditions.push(Condition {
                    field: "date".to_string(),
                    op: Op::Lte,
                    value: end.to_string(),
                });
            }
        }

        // Map iteration order is unspecified; keep the rendered SQL stable.
        conditions.sort_by(|a, b| (&a.field, a.op, &a.value).cmp(&(&b.field, b.op, &b.value)));

        Self {
            conditions,
            search,
            sort,
            fields,
            page,
            limit,
            all,
        }
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

fn parse_filter_key(key: &str) -> (String, Op) {
    if let Some(open) = key.find('[') {
        if let Some(stripped) = key[open..].strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if let Some(op) = Op::from_suffix(stripped) {
                return (key[..open].to_string(), op);
            }
        }
    }
    (key.to_string(), Op::Eq)
}

fn parse_sort(spec: &str) -> Vec<SortKey> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .map(|s| match s.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                descending: true,
            },
            None => SortKey {
                field: s.to_string(),
                descending: false,
            },
        })
        .collect()
}

fn parse_projection(spec: &str) -> Option<Projection> {
    let tokens: Vec<&str> = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .collect();
    if tokens.is_empty() {
        return None;
    }
    let include = !tokens[0].starts_with('-');
    let fields = tokens
        .iter()
        .map(|t| t.trim_start_matches('-').to_string())
        .collect();
    Some(Projection { include, fields })
}

/// A parsed filter value, ready to bind.
#[derive(Debug, Clone)]
enum TypedValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    TextList(Vec<String>),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    UuidList(Vec<Uuid>),
}

#[derive(Debug, Clone)]
struct TypedCondition {
    column: &'static str,
    kind: FieldKind,
    op: Op,
    value: TypedValue,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}

fn parse_scalar(kind: FieldKind, raw: &str) -> Option<TypedValue> {
    match kind {
        FieldKind::Text => Some(TypedValue::Text(raw.to_string())),
        FieldKind::Int => raw.parse().ok().map(TypedValue::Int),
        FieldKind::Float => raw.parse().ok().map(TypedValue::Float),
        FieldKind::Bool => match raw {
            "true" => Some(TypedValue::Bool(true)),
            "false" => Some(TypedValue::Bool(false)),
            _ => None,
        },
        FieldKind::Uuid => Uuid::parse_str(raw).ok().map(TypedValue::Uuid),
        FieldKind::Timestamp => parse_timestamp(raw).map(TypedValue::Timestamp),
    }
}

fn parse_list(kind: FieldKind, raw: &str) -> Option<TypedValue> {
    let items: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    if items.is_empty() {
        return None;
    }
    match kind {
        FieldKind::Text => Some(TypedValue::TextList(
            items.iter().map(|s| s.to_string()).collect(),
        )),
        FieldKind::Int => items
            .iter()
            .map(|s| s.parse().ok())
            .collect::<Option<Vec<i64>>>()
            .map(TypedValue::IntList),
        FieldKind::Float => items
            .iter()
            .map(|s| s.parse().ok())
            .collect::<Option<Vec<f64>>>()
            .map(TypedValue::FloatList),
        FieldKind::Uuid => items
            .iter()
            .map(|s| Uuid::parse_str(s).ok())
            .collect::<Option<Vec<Uuid>>>()
            .map(TypedValue::UuidList),
        // A membership test over booleans or timestamps has no sensible
        // meaning here.
        FieldKind::Bool | FieldKind::Timestamp => None,
    }
}

/// Resolve raw conditions against the collection. Unknown fields and
/// unparseable values are dropped rather than failing the request.
fn typed_conditions(spec: &QuerySpec, coll: &Collection) -> Vec<TypedCondition> {
    let mut out = Vec::with_capacity(spec.conditions.len());
    for cond in &spec.conditions {
        let Some(field) = coll.field(&cond.field) else {
            debug!(resource = coll.resource, field = %cond.field, "Dropping unknown filter field");
            continue;
        };
        let value = if cond.op == Op::In {
            parse_list(field.kind, &cond.value)
        } else {
            parse_scalar(field.kind, &cond.value)
        };
        let Some(value) = value else {
            debug!(
                resource = coll.resource,
                field = %cond.field,
                "Dropping filter value that does not parse for its column kind"
            );
            continue;
        };
        out.push(TypedCondition {
            column: field.column,
            kind: field.kind,
            op: cond.op,
            value,
        });
    }
    out
}

/// Escape LIKE metacharacters so keyword tokens match literally.
fn escape_like(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone)]
struct SearchClause {
    columns: &'static [&'static str],
    /// One `%escaped%` pattern per whitespace-separated token.
    patterns: Vec<String>,
}

fn search_clause(spec: &QuerySpec, coll: &Collection) -> Option<SearchClause> {
    let keyword = spec.search.as_deref()?;
    if coll.searchable.is_empty() {
        return None;
    }
    let patterns: Vec<String> = keyword
        .split_whitespace()
        .map(|token| format!("%{}%", escape_like(token)))
        .collect();
    if patterns.is_empty() {
        return None;
    }
    Some(SearchClause {
        columns: coll.searchable,
        patterns,
    })
}

/// Sort keys that survive validation, or the default creation-time ordering.
fn sort_keys(spec: &QuerySpec, coll: &Collection) -> Vec<(&'static str, bool)> {
    let mut keys: Vec<(&'static str, bool)> = spec
        .sort
        .iter()
        .filter_map(|key| {
            let field = coll.field(&key.field)?;
            Some((field.column, key.descending))
        })
        .collect();
    if keys.is_empty() {
        if let Some(created) = coll.field("created_at") {
            keys.push((created.column, true));
        }
    }
    keys
}

fn push_bind_scalar(qb: &mut QueryBuilder<'_, Postgres>, value: &TypedValue) {
    match value {
        TypedValue::Text(v) => qb.push_bind(v.clone()),
        TypedValue::Int(v) => qb.push_bind(*v),
        TypedValue::Float(v) => qb.push_bind(*v),
        TypedValue::Bool(v) => qb.push_bind(*v),
        TypedValue::Uuid(v) => qb.push_bind(*v),
        TypedValue::Timestamp(v) => qb.push_bind(*v),
        TypedValue::TextList(v) => qb.push_bind(v.clone()),
        TypedValue::IntList(v) => qb.push_bind(v.clone()),
        TypedValue::FloatList(v) => qb.push_bind(v.clone()),
        TypedValue::UuidList(v) => qb.push_bind(v.clone()),
    };
}

/// Render the shared WHERE clause. Both counts and the page fetch go
/// through this function with the same inputs, so `total_filtered` always
/// reflects exactly the condition used to fetch `data`.
fn push_where(
    qb: &mut QueryBuilder<'_, Postgres>,
    coll: &Collection,
    conditions: &[TypedCondition],
    search: Option<&SearchClause>,
) {
    qb.push(" WHERE 1=1");

    if let Some(predicate) = coll.soft_delete {
        qb.push(" AND ");
        qb.push(predicate);
    }

    for cond in conditions {
        qb.push(" AND ");
        // Numeric columns are compared in float8 so int and numeric columns
        // behave the same under one bind type.
        if cond.kind == FieldKind::Float {
            qb.push("(");
            qb.push(cond.column);
            qb.push(")::float8");
        } else {
            qb.push(cond.column);
        }
        qb.push(cond.op.sql());
        push_bind_scalar(qb, &cond.value);
        if cond.op == Op::In {
            qb.push(")");
        }
    }

    if let Some(search) = search {
        for pattern in &search.patterns {
            qb.push(" AND (");
            for (i, column) in search.columns.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column);
                qb.push("::text ILIKE ");
                qb.push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }
}

fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, keys: &[(&'static str, bool)]) {
    if keys.is_empty() {
        return;
    }
    qb.push(" ORDER BY ");
    for (i, (column, descending)) in keys.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*column);
        qb.push(if *descending { " DESC" } else { " ASC" });
    }
}

fn apply_projection(rows: &mut [Value], projection: &Projection) {
    for row in rows.iter_mut() {
        if let Value::Object(map) = row {
            map.retain(|key, _| {
                key == "id"
                    || if projection.include {
                        projection.fields.iter().any(|f| f == key)
                    } else {
                        !projection.fields.iter().any(|f| f == key)
                    }
            });
        }
    }
}

/// Result envelope for list endpoints. `total` ignores filters and search;
/// `total_filtered` matches the condition used to fetch `data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResult {
    pub data: Vec<Value>,
    pub total: i64,
    pub total_filtered: i64,
}

/// Documented query surface of every list endpoint. Handlers read the raw
/// parameter map (arbitrary filter keys are allowed); this struct exists
/// for the OpenAPI docs.
#[derive(Debug, Deserialize, IntoParams)]
#[allow(dead_code)]
pub struct ListQuery {
    /// Page number, 1-based (default 1)
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Page size (default 100)
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Comma-separated sort fields, "-" prefix for descending
    pub sort: Option<String>,
    /// Comma-separated field projection, "-" prefix for exclusion
    pub fields: Option<String>,
    /// Return the full filtered set, ignoring page/limit
    pub all: Option<bool>,
    /// Keyword search across the resource's searchable fields
    pub search: Option<String>,
    /// Start of a date range filter (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// End of a date range filter (YYYY-MM-DD)
    pub end_date: Option<String>,
}

/// Fetch a filtered, searched, sorted, paginated page plus both counts.
///
/// The page fetch, the unfiltered count, and the filtered count are
/// independent and run concurrently; all three must succeed.
pub async fn list_documents<T, R>(
    db: &PgPool,
    repo: &R,
    params: &HashMap<String, String>,
) -> Result<ListResult, AppError>
where
    T: Serialize + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    R: Repository + ?Sized,
{
    let coll = repo.collection();
    let spec = QuerySpec::from_params(params);
    let conditions = typed_conditions(&spec, coll);
    let search = search_clause(&spec, coll);
    let sort = sort_keys(&spec, coll);

    let mut data_query = QueryBuilder::new(coll.select);
    push_where(&mut data_query, coll, &conditions, search.as_ref());
    push_order_by(&mut data_query, &sort);
    if !spec.all {
        data_query.push(format!(" LIMIT {} OFFSET {}", spec.limit, spec.offset()));
    }

    let mut filtered_query = QueryBuilder::new("SELECT COUNT(*) FROM ");
    filtered_query.push(coll.count_from);
    push_where(&mut filtered_query, coll, &conditions, search.as_ref());

    let mut total_query = QueryBuilder::new("SELECT COUNT(*) FROM ");
    total_query.push(coll.count_from);
    push_where(&mut total_query, coll, &[], None);

    let data_fut = data_query.build_query_as::<T>().fetch_all(db);
    let filtered_fut = filtered_query.build_query_scalar::<i64>().fetch_one(db);
    let total_fut = total_query.build_query_scalar::<i64>().fetch_one(db);

    let (rows, total_filtered, total) = tokio::try_join!(data_fut, filtered_fut, total_fut)
        .map_err(|e| {
            tracing::error!(error = %e, resource = coll.resource, "Database error executing list query");
            AppError::database(e)
        })?;

    let mut values = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;

    if let Some(projection) = &spec.fields {
        apply_projection(&mut values, projection);
    }

    let data = repo.enrich(db, values).await?;

    Ok(ListResult {
        data,
        total,
        total_filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FIELDS: &[FilterField] = &[
        FilterField::new("status", "c.status", FieldKind::Text),
        FilterField::new("amount", "c.amount", FieldKind::Float),
        FilterField::new("floor", "c.floor", FieldKind::Int),
        FilterField::new("owner_id", "c.owner_id", FieldKind::Uuid),
        FilterField::new("date", "c.contract_date", FieldKind::Timestamp),
        FilterField::new("created_at", "c.created_at", FieldKind::Timestamp),
    ];

    const TEST_COLLECTION: Collection = Collection {
        resource: "contracts",
        select: "SELECT c.id, c.status FROM contracts c",
        count_from: "contracts c",
        soft_delete: None,
        filterable: TEST_FIELDS,
        searchable: &["c.status", "c.contract_number"],
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn rendered_where(
        coll: &Collection,
        conditions: &[TypedCondition],
        search: Option<&SearchClause>,
    ) -> String {
        let mut qb = QueryBuilder::new("");
        push_where(&mut qb, coll, conditions, search);
        qb.into_sql()
    }

    #[test]
    fn test_defaults() {
        let spec = QuerySpec::from_params(&params(&[]));
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 100);
        assert!(!spec.all);
        assert!(spec.conditions.is_empty());
        assert!(spec.search.is_none());
        assert!(spec.sort.is_empty());
        assert!(spec.fields.is_none());
    }

    #[test]
    fn test_reserved_keys_are_not_filters() {
        let spec = QuerySpec::from_params(&params(&[
            ("page", "2"),
            ("limit", "10"),
            ("sort", "-amount"),
            ("fields", "status"),
            ("all", "false"),
            ("search", "villa"),
            ("status", "active"),
        ]));
        assert_eq!(spec.conditions.len(), 1);
        assert_eq!(spec.conditions[0].field, "status");
        assert_eq!(spec.conditions[0].op, Op::Eq);
    }

    #[test]
    fn test_operator_suffixes() {
        let spec = QuerySpec::from_params(&params(&[
            ("amount[gte]", "100"),
            ("amount[lt]", "500"),
            ("status[ne]", "draft"),
            ("floor[in]", "1,2,3"),
        ]));
        let ops: Vec<Op> = spec.conditions.iter().map(|c| c.op).collect();
        assert!(ops.contains(&Op::Gte));
        assert!(ops.contains(&Op::Lt));
        assert!(ops.contains(&Op::Ne));
        assert!(ops.contains(&Op::In));
    }

    #[test]
    fn test_unknown_operator_suffix_is_part_of_field_name() {
        let (field, op) = parse_filter_key("amount[median]");
        assert_eq!(field, "amount[median]");
        assert_eq!(op, Op::Eq);
    }

    #[test]
    fn test_empty_values_dropped() {
        let spec = QuerySpec::from_params(&params(&[("status", ""), ("amount", "  ")]));
        assert!(spec.conditions.is_empty());
    }

    #[test]
    fn test_invalid_page_and_limit_fall_back() {
        for (page, limit) in [("0", "0"), ("-3", "-1"), ("abc", "xyz"), ("", "")] {
            let spec = QuerySpec::from_params(&params(&[("page", page), ("limit", limit)]));
            assert_eq!(spec.page, 1, "page {:?}", page);
            assert_eq!(spec.limit, 100, "limit {:?}", limit);
        }
    }

    #[test]
    fn test_pagination_offsets() {
        let spec = QuerySpec::from_params(&params(&[("page", "3"), ("limit", "2")]));
        assert_eq!(spec.offset(), 4);
        let first = QuerySpec::from_params(&params(&[("page", "1"), ("limit", "2")]));
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn test_all_skips_pagination() {
        let spec = QuerySpec::from_params(&params(&[
            ("all", "true"),
            ("page", "3"),
            ("limit", "2"),
        ]));
        assert!(spec.all);
        // page/limit are still parsed but the pipeline never applies them
        // when all=true; the LIMIT clause is gated on spec.all.
    }

    #[test]
    fn test_date_range_synthesis() {
        let spec = QuerySpec::from_params(&params(&[
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-31"),
        ]));
        assert_eq!(spec.conditions.len(), 2);
        assert!(spec
            .conditions
            .iter()
            .any(|c| c.field == "date" && c.op == Op::Gte && c.value == "2024-01-01"));
        assert!(spec
            .conditions
            .iter()
            .any(|c| c.field == "date" && c.op == Op::Lte && c.value == "2024-01-31"));
    }

    #[test]
    fn test_date_range_overrides_literal_date_key() {
        let spec = QuerySpec::from_params(&params(&[
            ("date", "2020-06-15"),
            ("start_date", "2024-01-01"),
        ]));
        assert_eq!(spec.conditions.len(), 1);
        assert_eq!(spec.conditions[0].op, Op::Gte);
        assert_eq!(spec.conditions[0].value, "2024-01-01");
    }

    #[test]
    fn test_camel_case_date_range_aliases() {
        let snake = QuerySpec::from_params(&params(&[
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-31"),
        ]));
        let camel = QuerySpec::from_params(&params(&[
            ("startDate", "2024-01-01"),
            ("endDate", "2024-01-31"),
        ]));
        assert_eq!(snake.conditions, camel.conditions);
        // neither spelling leaks through as a filter key
        assert!(camel.conditions.iter().all(|c| c.field == "date"));
    }

    #[test]
    fn test_date_range_matches_explicit_operator_filters() {
        let range = QuerySpec::from_params(&params(&[
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-31"),
        ]));
        let explicit = QuerySpec::from_params(&params(&[
            ("date[gte]", "2024-01-01"),
            ("date[lte]", "2024-01-31"),
        ]));
        assert_eq!(range.conditions, explicit.conditions);
    }

    #[test]
    fn test_sort_parsing() {
        let spec = QuerySpec::from_params(&params(&[("sort", "-amount,status")]));
        assert_eq!(
            spec.sort,
            vec![
                SortKey {
                    field: "amount".to_string(),
                    descending: true
                },
                SortKey {
                    field: "status".to_string(),
                    descending: false
                },
            ]
        );
    }

    #[test]
    fn test_sort_validation_and_default() {
        let spec = QuerySpec::from_params(&params(&[("sort", "password,-amount")]));
        let keys = sort_keys(&spec, &TEST_COLLECTION);
        assert_eq!(keys, vec![("c.amount", true)]);

        let unsorted = QuerySpec::from_params(&params(&[]));
        let keys = sort_keys(&unsorted, &TEST_COLLECTION);
        assert_eq!(keys, vec![("c.created_at", true)]);
    }

    #[test]
    fn test_unknown_filter_fields_dropped() {
        let spec = QuerySpec::from_params(&params(&[
            ("status", "active"),
            ("password", "x"),
            ("drop_table", "y"),
        ]));
        let conds = typed_conditions(&spec, &TEST_COLLECTION);
        assert_eq!(conds.len(), 1);
        assert_eq!(conds[0].column, "c.status");
    }

    #[test]
    fn test_unparseable_values_dropped() {
        let spec = QuerySpec::from_params(&params(&[
            ("amount[gte]", "cheap"),
            ("owner_id", "not-a-uuid"),
            ("floor", "ground"),
        ]));
        assert!(typed_conditions(&spec, &TEST_COLLECTION).is_empty());
    }

    #[test]
    fn test_in_list_parsing() {
        let spec = QuerySpec::from_params(&params(&[("floor[in]", "1, 2,3")]));
        let conds = typed_conditions(&spec, &TEST_COLLECTION);
        assert_eq!(conds.len(), 1);
        match &conds[0].value {
            TypedValue::IntList(items) => assert_eq!(items, &vec![1, 2, 3]),
            other => panic!("expected int list, got {:?}", other),
        }
    }

    #[test]
    fn test_like_escaping() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_search_tokens_and_across_fields_or() {
        let spec = QuerySpec::from_params(&params(&[("search", "john doe")]));
        let search = search_clause(&spec, &TEST_COLLECTION).unwrap();
        assert_eq!(search.patterns, vec!["%john%", "%doe%"]);

        let sql = rendered_where(&TEST_COLLECTION, &[], Some(&search));
        // one AND-group per token, OR within the group
        assert_eq!(sql.matches(" AND (").count(), 2);
        assert_eq!(sql.matches(" OR ").count(), 2);
        assert_eq!(sql.matches("ILIKE").count(), 4);
    }

    #[test]
    fn test_search_metacharacters_do_not_break_rendering() {
        let spec = QuerySpec::from_params(&params(&[("search", "100% (villa)")]));
        let search = search_clause(&spec, &TEST_COLLECTION).unwrap();
        assert_eq!(search.patterns[0], "%100\\%%");
        let sql = rendered_where(&TEST_COLLECTION, &[], Some(&search));
        assert!(sql.contains("ILIKE"));
    }

    #[test]
    fn test_capitalized_search_key_accepted() {
        let spec = QuerySpec::from_params(&params(&[("Search", "villa")]));
        assert_eq!(spec.search.as_deref(), Some("villa"));
    }

    #[test]
    fn test_where_combines_filters_and_search_with_and() {
        let spec = QuerySpec::from_params(&params(&[
            ("status", "active"),
            ("search", "tower"),
        ]));
        let conds = typed_conditions(&spec, &TEST_COLLECTION);
        let search = search_clause(&spec, &TEST_COLLECTION);
        let sql = rendered_where(&TEST_COLLECTION, &conds, search.as_ref());
        assert!(sql.starts_with(" WHERE 1=1"));
        assert!(sql.contains("c.status = $1"));
        assert!(sql.contains(" AND (c.status::text ILIKE $2 OR c.contract_number::text ILIKE $3)"));
    }

    #[test]
    fn test_soft_delete_predicate_applies_to_unfiltered_where() {
        let coll = Collection {
            soft_delete: Some("c.deleted_at IS NULL"),
            ..TEST_COLLECTION
        };
        let sql = rendered_where(&coll, &[], None);
        assert_eq!(sql, " WHERE 1=1 AND c.deleted_at IS NULL");
    }

    #[test]
    fn test_float_comparison_casts_column() {
        let spec = QuerySpec::from_params(&params(&[("amount[gte]", "250.5")]));
        let conds = typed_conditions(&spec, &TEST_COLLECTION);
        let sql = rendered_where(&TEST_COLLECTION, &conds, None);
        assert!(sql.contains("(c.amount)::float8 >= $1"));
    }

    #[test]
    fn test_filtered_count_where_matches_data_where() {
        let spec = QuerySpec::from_params(&params(&[
            ("status[ne]", "draft"),
            ("amount[gte]", "100"),
            ("search", "tower north"),
        ]));
        let conds = typed_conditions(&spec, &TEST_COLLECTION);
        let search = search_clause(&spec, &TEST_COLLECTION);

        let data_where = rendered_where(&TEST_COLLECTION, &conds, search.as_ref());
        let count_where = rendered_where(&TEST_COLLECTION, &conds, search.as_ref());
        assert_eq!(data_where, count_where);
    }

    #[test]
    fn test_projection_inclusion_keeps_id() {
        let mut rows = vec![serde_json::json!({
            "id": "1", "status": "active", "amount": 10, "notes": "x"
        })];
        apply_projection(
            &mut rows,
            &Projection {
                include: true,
                fields: vec!["status".to_string()],
            },
        );
        let obj = rows[0].as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("status"));
    }

    #[test]
    fn test_projection_exclusion() {
        let mut rows = vec![serde_json::json!({
            "id": "1", "status": "active", "notes": "secret"
        })];
        apply_projection(
            &mut rows,
            &Projection {
                include: false,
                fields: vec!["notes".to_string()],
            },
        );
        let obj = rows[0].as_object().unwrap();
        assert!(obj.contains_key("status"));
        assert!(!obj.contains_key("notes"));
    }

    #[test]
    fn test_projection_spec_parsing() {
        let include = parse_projection("status,amount").unwrap();
        assert!(include.include);
        assert_eq!(include.fields, vec!["status", "amount"]);

        let exclude = parse_projection("-notes,-amount").unwrap();
        assert!(!exclude.include);
        assert_eq!(exclude.fields, vec!["notes", "amount"]);

        assert!(parse_projection(" , ").is_none());
    }
}
