//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

#[cfg(test)]
mod tests {
    use crate::query_builder::sql_generation::SqlGenerator;
    use crate::query_builder::{
        paginated_response, parse_pagination, Condition, PaginationPolicy, PaginationQuery,
        QueryBuilder, SortOrder, SortWhitelist,
    };
    use serde_json::{json, Value};

    /// Every `$n` index referenced by rendered SQL, in order of appearance
    fn placeholder_indices(sql: &str) -> Vec<usize> {
        let mut indices = Vec::new();
        let mut chars = sql.char_indices().peekable();
        while let Some((_, c)) = chars.next() {
            if c != '$' {
                continue;
            }
            let mut digits = String::new();
            while let Some((_, d)) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(*d);
                    chars.next();
                } else {
                    break;
                }
            }
            if let Ok(index) = digits.parse() {
                indices.push(index);
            }
        }
        indices
    }

    // ========================================
    // Conditions
    // ========================================

    #[test]
    fn test_empty_builder_has_empty_where_clause() {
        let builder = QueryBuilder::new();
        assert_eq!(builder.where_clause(), "");
        assert!(builder.params().is_empty());
        assert_eq!(builder.next_index(), 1);
    }

    #[test]
    fn test_add_condition_numbers_placeholders_in_order() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("o.order_status = $?", Some("SHIPPED"))
            .add_condition("o.channel = $?", Some("Instagram"))
            .add_condition("c.age >= $?", Some(30));

        assert_eq!(
            builder.where_clause(),
            "WHERE o.order_status = $1 AND o.channel = $2 AND c.age >= $3"
        );
        assert_eq!(
            builder.params(),
            vec![json!("SHIPPED"), json!("Instagram"), json!(30)]
        );
        assert_eq!(builder.next_index(), 4);
    }

    #[test]
    fn test_absent_values_are_no_ops() {
        let mut builder = QueryBuilder::new();
        builder.add_condition("c.gender = $?", Some("Female"));
        let where_before = builder.where_clause();
        let params_before = builder.params();

        builder
            .add_condition("o.order_status = $?", None::<&str>)
            .add_condition("o.channel = $?", Some(""))
            .add_condition("p.category = $?", Some("All"))
            .add_condition("c.city = $?", Some(Value::Null));

        assert_eq!(builder.where_clause(), where_before);
        assert_eq!(builder.params(), params_before);
        assert_eq!(builder.next_index(), 2);
    }

    #[test]
    fn test_all_is_case_sensitive_and_whitespace_is_present() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("p.category = $?", Some("all"))
            .add_condition("c.city = $?", Some(" "));

        assert_eq!(builder.params(), vec![json!("all"), json!(" ")]);
    }

    #[test]
    fn test_absent_value_after_present_does_not_skip_an_index() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("a = $?", Some("x"))
            .add_condition("b = $?", None::<String>)
            .add_condition("c = $?", Some("z"));

        assert_eq!(builder.where_clause(), "WHERE a = $1 AND c = $2");
        assert_eq!(builder.params(), vec![json!("x"), json!("z")]);
    }

    #[test]
    fn test_injection_attempts_stay_in_params() {
        let hostile = "'; DROP TABLE orders_table; --";
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("c.city = $?", Some(hostile))
            .add_search(&["c.name"], Some(hostile));

        let sql = builder.where_clause();
        assert!(!sql.contains("DROP"));
        assert_eq!(sql, "WHERE c.city = $1 AND (c.name ILIKE $2)");
        assert_eq!(builder.params()[0], json!(hostile));
        assert_eq!(builder.params()[1], json!(format!("%{}%", hostile)));
    }

    #[test]
    #[should_panic(expected = "exactly one")]
    fn test_template_without_marker_panics() {
        QueryBuilder::new().add_condition("o.channel = 'Online'", Some("x"));
    }

    #[test]
    #[should_panic(expected = "exactly one")]
    fn test_template_with_two_markers_panics() {
        QueryBuilder::new().add_condition("o.total BETWEEN $? AND $?", Some(10));
    }

    #[test]
    #[should_panic(expected = "exactly one")]
    fn test_malformed_template_panics_even_when_value_absent() {
        QueryBuilder::new().add_condition("o.channel = channel", None::<&str>);
    }

    // ========================================
    // Search
    // ========================================

    #[test]
    fn test_search_fans_out_over_columns_with_one_param() {
        let mut builder = QueryBuilder::new();
        builder.add_search(&["name", "email"], Some("ana"));

        assert_eq!(builder.where_clause(), "WHERE (name ILIKE $1 OR email ILIKE $1)");
        assert_eq!(builder.params(), vec![json!("%ana%")]);
    }

    #[test]
    fn test_search_trims_the_term() {
        let mut builder = QueryBuilder::new();
        builder.add_search(&["p.name"], Some("  air max \t"));
        assert_eq!(builder.params(), vec![json!("%air max%")]);
    }

    #[test]
    fn test_blank_search_is_no_op() {
        let mut builder = QueryBuilder::new();
        builder
            .add_search(&["a", "b", "c"], Some("  "))
            .add_search(&["a", "b", "c"], Some(""))
            .add_search(&["a", "b", "c"], None);

        assert_eq!(builder.where_clause(), "");
        assert!(builder.params().is_empty());
    }

    #[test]
    fn test_search_between_conditions_keeps_numbering() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("c.gender = $?", Some("Male"))
            .add_search(&["c.name", "c.email", "c.city"], Some("pune"))
            .add_condition("c.city = $?", Some("Pune"));

        assert_eq!(
            builder.where_clause(),
            "WHERE c.gender = $1 AND (c.name ILIKE $2 OR c.email ILIKE $2 OR c.city ILIKE $2) AND c.city = $3"
        );
        assert_eq!(
            builder.params(),
            vec![json!("Male"), json!("%pune%"), json!("Pune")]
        );
    }

    #[test]
    #[should_panic(expected = "at least one column")]
    fn test_search_without_columns_panics() {
        QueryBuilder::new().add_search(&[], Some("ana"));
    }

    #[test]
    fn test_placeholders_match_params_for_mixed_sequences() {
        let mut builder = QueryBuilder::new();
        for i in 0..25 {
            if i % 3 == 0 {
                builder.add_search(&["x", "y"], Some("term"));
            } else if i % 3 == 1 {
                builder.add_condition("f = $?", Some(i));
            } else {
                builder.add_condition("g = $?", None::<i64>);
            }
        }

        let sql = builder.where_clause();
        let params = builder.params();
        let mut distinct = placeholder_indices(&sql);
        distinct.dedup();

        assert_eq!(distinct.len(), params.len());
        assert_eq!(distinct, (1..=params.len()).collect::<Vec<_>>());
        assert_eq!(builder.next_index(), params.len() + 1);
    }

    #[test]
    fn test_where_clause_is_idempotent() {
        let mut builder = QueryBuilder::new();
        builder.add_search(&["name"], Some("ana"));

        let first = builder.where_clause();
        let second = builder.where_clause();
        assert_eq!(first, second);
        assert_eq!(builder.params().len(), 1);
    }

    // ========================================
    // Pagination protocol
    // ========================================

    #[test]
    fn test_snapshot_is_unaffected_by_pagination() {
        let mut builder = QueryBuilder::new();
        builder.add_search(&["name", "email"], Some("ana"));

        let snapshot = builder.params();
        let clause = builder.add_pagination(20, 40);

        assert_eq!(snapshot, vec![json!("%ana%")]);
        assert_eq!(builder.params(), vec![json!("%ana%"), json!(20), json!(40)]);
        assert_eq!(clause, "LIMIT $2 OFFSET $3");
        assert_eq!(builder.next_index(), 4);
    }

    #[test]
    fn test_filter_params_never_include_pagination() {
        let mut builder = QueryBuilder::new();
        builder.add_condition("o.channel = $?", Some("Offline Store"));
        builder.add_pagination(10, 0);

        assert_eq!(builder.filter_params(), vec![json!("Offline Store")]);
        assert_eq!(builder.where_clause(), "WHERE o.channel = $1");
    }

    #[test]
    fn test_pagination_on_empty_builder_starts_at_one() {
        let mut builder = QueryBuilder::new();
        assert_eq!(builder.add_pagination(20, 0), "LIMIT $1 OFFSET $2");
        assert_eq!(builder.params(), vec![json!(20), json!(0)]);
    }

    #[test]
    #[should_panic(expected = "before pagination")]
    fn test_condition_after_pagination_panics() {
        let mut builder = QueryBuilder::new();
        builder.add_pagination(20, 0);
        builder.add_condition("o.channel = $?", Some("Online Website"));
    }

    #[test]
    fn test_absent_condition_after_pagination_is_still_a_no_op() {
        let mut builder = QueryBuilder::new();
        builder.add_pagination(20, 0);
        builder.add_condition("o.channel = $?", Some("All"));
        assert_eq!(builder.params().len(), 2);
    }

    #[test]
    #[should_panic(expected = "already added")]
    fn test_double_pagination_panics() {
        let mut builder = QueryBuilder::new();
        builder.add_pagination(20, 0);
        builder.add_pagination(20, 20);
    }

    // ========================================
    // Condition rendering
    // ========================================

    #[test]
    fn test_condition_render_replaces_marker() {
        let condition = Condition::fragment("o.order_status = $?", json!("PENDING"));
        assert_eq!(condition.render(7), "o.order_status = $7");
        assert_eq!(condition.value(), &json!("PENDING"));
    }

    #[test]
    fn test_marker_inside_cast_renders() {
        let condition = Condition::fragment("c.age >= $?::int", json!(25));
        assert_eq!(condition.render(2), "c.age >= $2::int");
    }

    #[test]
    fn test_blank_search_condition_is_none() {
        assert!(Condition::search(&["a"], " \n ").is_none());
    }

    #[test]
    fn test_having_clause_generation() {
        assert_eq!(SqlGenerator::build_having_clause(&[]), "");
        assert_eq!(
            SqlGenerator::build_having_clause(&["SUM(x) > 0", "SUM(x) < 20"]),
            "HAVING SUM(x) > 0 AND SUM(x) < 20"
        );
    }

    // ========================================
    // Ordering
    // ========================================

    const PRODUCT_SORTS: SortWhitelist = SortWhitelist::new(
        &[("name", "p.name"), ("price", "p.base_price")],
        "\"totalRevenue\"",
    );

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::from_query(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(None), SortOrder::Desc);
    }

    #[test]
    fn test_sort_whitelist_resolves_known_keys_only() {
        assert_eq!(PRODUCT_SORTS.resolve(Some("price")), "p.base_price");
        assert_eq!(PRODUCT_SORTS.resolve(Some("p.base_price")), "\"totalRevenue\"");
        assert_eq!(PRODUCT_SORTS.resolve(Some("1; DROP TABLE x")), "\"totalRevenue\"");
        assert_eq!(PRODUCT_SORTS.resolve(None), "\"totalRevenue\"");
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(
            PRODUCT_SORTS.order_clause(Some("name"), Some("asc")),
            "ORDER BY p.name ASC"
        );
        assert_eq!(
            PRODUCT_SORTS.order_clause(None, None),
            "ORDER BY \"totalRevenue\" DESC"
        );
    }

    // ========================================
    // Pagination helper
    // ========================================

    fn parse(page: Option<&str>, limit: Option<&str>) -> (i64, i64, i64) {
        let request = parse_pagination(
            &PaginationQuery::new(page, limit),
            &PaginationPolicy::default(),
        );
        (request.page, request.limit, request.offset)
    }

    #[test]
    fn test_parse_pagination_invalid_input_falls_back() {
        assert_eq!(parse(Some("abc"), Some("-5")), (1, 20, 0));
        assert_eq!(parse(None, None), (1, 20, 0));
        assert_eq!(parse(Some("0"), Some("0")), (1, 20, 0));
        assert_eq!(parse(Some(""), Some("ten")), (1, 20, 0));
    }

    #[test]
    fn test_parse_pagination_valid_input() {
        assert_eq!(parse(Some("3"), Some("10")), (3, 10, 20));
        assert_eq!(parse(Some(" 2 "), Some("1")), (2, 1, 1));
    }

    #[test]
    fn test_parse_pagination_caps_limit() {
        assert_eq!(parse(Some("1"), Some("5000")), (1, 100, 0));
        assert_eq!(parse(Some("2"), Some("100")), (2, 100, 100));
    }

    #[test]
    fn test_parse_pagination_respects_custom_policy() {
        let policy = PaginationPolicy::new(50, 200);
        let request = parse_pagination(&PaginationQuery::new(Some("4"), None), &policy);
        assert_eq!((request.page, request.limit, request.offset), (4, 50, 150));
    }

    #[test]
    fn test_parse_pagination_huge_page_does_not_overflow() {
        let (page, limit, offset) = parse(Some(&i64::MAX.to_string()), Some("100"));
        assert_eq!(page, i64::MAX);
        assert_eq!(limit, 100);
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn test_paginated_response_total_pages() {
        let rows: Vec<i32> = (0..5).collect();
        let response = paginated_response(rows, 47, 3, 10);

        assert!(response.success);
        assert_eq!(response.data.len(), 5);
        assert_eq!(response.pagination.page, 3);
        assert_eq!(response.pagination.limit, 10);
        assert_eq!(response.pagination.total, 47);
        assert_eq!(response.pagination.total_pages, 5);
    }

    #[test]
    fn test_paginated_response_empty() {
        let response = paginated_response(Vec::<Value>::new(), 0, 1, 20);
        assert_eq!(response.pagination.total_pages, 0);
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_paginated_response_exact_multiple() {
        let response = paginated_response(Vec::<Value>::new(), 40, 2, 20);
        assert_eq!(response.pagination.total_pages, 2);
    }

    #[test]
    fn test_paginated_response_serializes_camel_case() {
        let response = paginated_response(vec![json!({"id": 1})], 1, 1, 20);
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(
            body,
            json!({
                "success": true,
                "data": [{"id": 1}],
                "pagination": {"page": 1, "limit": 20, "total": 1, "totalPages": 1}
            })
        );
    }
}
