#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::{
        validate_search_term, Combinator, DataType, Error, FilterSpec, FilterValue, ListQuery,
        MatchMode, Page, PageMeta, WireFilter,
    };
    use serde_json::json;

    fn wire(id: &str, value: serde_json::Value, mode: MatchMode, dt: DataType) -> WireFilter {
        WireFilter {
            id: id.to_string(),
            value,
            match_mode: mode,
            data_type: dt,
            mode: Combinator::And,
        }
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, size, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (23, 10, 3)]
        {
            let meta = PageMeta::compute(0, size, total).unwrap();
            assert_eq!(meta.total_pages, expected, "total={total} size={size}");
        }
    }

    #[test]
    fn test_zero_size_fails_fast() {
        assert_eq!(PageMeta::compute(0, 0, 5), Err(Error::InvalidPageSize));
        assert_eq!(PageMeta::offset_of(3, 0), Err(Error::InvalidPageSize));
    }

    #[test]
    fn test_offset_must_fit_a_signed_bind() {
        let max = i64::MAX as u64;
        assert_eq!(PageMeta::offset_of(max, 1), Ok(max));
        assert!(matches!(
            PageMeta::offset_of(max + 1, 1),
            Err(Error::InvalidParam { param: "_page", .. })
        ));
        assert!(matches!(
            PageMeta::offset_of(1 << 62, 4),
            Err(Error::InvalidParam { param: "_page", .. })
        ));
        assert!(matches!(
            PageMeta::offset_of(u64::MAX, 2),
            Err(Error::InvalidParam { param: "_page", .. })
        ));
        assert!(matches!(
            PageMeta::offset_of(0, max + 1),
            Err(Error::InvalidParam { param: "_size", .. })
        ));
    }

    #[test]
    fn test_empty_result_first_page_is_not_last() {
        let meta = PageMeta::compute(0, 10, 0).unwrap();
        assert!(meta.first);
        assert!(!meta.last);
        assert!(meta.empty);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_page_past_the_end_is_not_last() {
        let meta = PageMeta::compute(5, 10, 23).unwrap();
        assert!(!meta.last);
        assert!(!meta.first);
        assert_eq!(meta.offset, 50);
    }

    #[test]
    fn test_last_page_of_three() {
        let meta = PageMeta::compute(2, 10, 23).unwrap();
        assert_eq!(meta.total_pages, 3);
        assert!(meta.last);
        assert!(!meta.first);
        assert!(!meta.empty);
    }

    #[test]
    fn test_assemble_counts_actual_rows() {
        let meta = PageMeta::compute(2, 10, 23).unwrap();
        let page = Page::assemble(vec![1, 2, 3], meta, true);
        assert_eq!(page.number_of_elements, 3);
        assert_eq!(page.size, 10);
        assert_eq!(page.pageable.offset, 20);
        assert_eq!(page.pageable.page_number, 2);
        assert!(page.sort.sorted);
        assert!(!page.sort.unsorted);
        assert!(!page.sort.empty);
        assert_eq!(page.pageable.sort, page.sort);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let meta = PageMeta::compute(0, 5, 0).unwrap();
        let page: Page<u8> = Page::assemble(vec![], meta, false);
        let v = serde_json::to_value(&page).unwrap();
        for key in [
            "content",
            "pageable",
            "sort",
            "totalPages",
            "totalElements",
            "size",
            "number",
            "numberOfElements",
            "last",
            "first",
            "empty",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["pageable"]["unPaged"], json!(false));
        assert_eq!(v["pageable"]["pageSize"], json!(5));
        assert_eq!(v["sort"]["unsorted"], json!(true));
    }

    #[test]
    fn test_map_items_keeps_envelope() {
        let meta = PageMeta::compute(1, 2, 5).unwrap();
        let page = Page::assemble(vec![3, 4], meta, false).map_items(|n| n * 10);
        assert_eq!(page.content, vec![30, 40]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 1);
    }

    #[test]
    fn test_between_on_boolean_is_rejected() {
        let err = FilterSpec::from_wire(wire(
            "active",
            json!([true, false]),
            MatchMode::Between,
            DataType::Boolean,
        ))
        .unwrap_err();
        assert_eq!(err.field(), Some("active"));
        assert!(matches!(err, Error::InvalidFilter { .. }));
    }

    #[test]
    fn test_between_requires_two_bounds() {
        let err = FilterSpec::from_wire(wire(
            "level",
            json!([1, 2, 3]),
            MatchMode::Between,
            DataType::Number,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { ref field, .. } if field == "level"));

        let err = FilterSpec::from_wire(wire("level", json!(5), MatchMode::Between, DataType::Number))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { .. }));
    }

    #[test]
    fn test_between_numbers_decodes_range() {
        let f = FilterSpec::from_wire(wire(
            "level",
            json!([10, "20"]),
            MatchMode::Between,
            DataType::Number,
        ))
        .unwrap();
        assert_eq!(f.value(), &FilterValue::NumberRange(10.0, 20.0));
        assert_eq!(f.data_type(), DataType::Number);
    }

    #[test]
    fn test_between_inverted_bounds_rejected() {
        let err = FilterSpec::from_wire(wire(
            "level",
            json!([20, 10]),
            MatchMode::Between,
            DataType::Number,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { .. }));
    }

    #[test]
    fn test_date_only_upper_bound_covers_whole_day() {
        let f = FilterSpec::from_wire(wire(
            "createdOn",
            json!(["2024-02-16", "2024-02-16"]),
            MatchMode::Between,
            DataType::Date,
        ))
        .unwrap();
        match f.value() {
            FilterValue::DateRange(lo, hi) => {
                assert_eq!(lo.to_string(), "2024-02-16 00:00:00");
                assert!(hi.to_string().starts_with("2024-02-16 23:59:59"));
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_contains_requires_text() {
        let err = FilterSpec::from_wire(wire("level", json!(3), MatchMode::Contains, DataType::Number))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { .. }));
    }

    #[test]
    fn test_less_than_rejects_text() {
        let err = FilterSpec::from_wire(wire("name", json!("b"), MatchMode::LessThan, DataType::Text))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { .. }));
    }

    #[test]
    fn test_boolean_accepts_string_literal() {
        let f = FilterSpec::from_wire(wire(
            "isDelete",
            json!("TRUE"),
            MatchMode::Equals,
            DataType::Boolean,
        ))
        .unwrap();
        assert_eq!(f.value(), &FilterValue::Bool(true));
    }

    #[test]
    fn test_unparseable_date_names_field() {
        let err = FilterSpec::from_wire(wire(
            "createdOn",
            json!("yesterday"),
            MatchMode::GreaterThan,
            DataType::Date,
        ))
        .unwrap_err();
        assert_eq!(err.field(), Some("createdOn"));
    }

    #[test]
    fn test_search_term_validation() {
        assert!(validate_search_term("").is_ok());
        assert!(validate_search_term("Ali Baba 42").is_ok());
        assert_eq!(validate_search_term("ali%"), Err(Error::InvalidSearch));
        assert_eq!(validate_search_term("x' OR 1=1"), Err(Error::InvalidSearch));
    }

    #[test]
    fn test_from_raw_defaults() {
        let q = ListQuery::from_raw(0, None, "[]", "[]", Some("")).unwrap();
        assert!(q.sort.is_empty());
        assert!(q.filter.is_empty());
        assert!(q.search.is_none());
    }

    #[test]
    fn test_from_raw_reports_bad_json_param() {
        let err = ListQuery::from_raw(0, None, "{not json", "[]", None).unwrap_err();
        assert!(matches!(err, Error::InvalidParam { param: "_sort", .. }));

        let err = ListQuery::from_raw(0, None, "[]", "[{\"id\":1}]", None).unwrap_err();
        assert!(matches!(err, Error::InvalidParam { param: "_filter", .. }));
    }

    #[test]
    fn test_from_raw_keeps_sort_order_and_combinators() {
        let q = ListQuery::from_raw(
            1,
            Some(5),
            r#"[{"id":"name","desc":true},{"id":"code"}]"#,
            r#"[{"id":"name","value":"a","matchMode":"EQUALS","dataType":"TEXT","mode":"OR"},
                {"id":"level","value":3,"matchMode":"EQUALS","dataType":"NUMBER"}]"#,
            None,
        )
        .unwrap();
        assert_eq!(q.sort[0].field, "name");
        assert!(q.sort[0].descending);
        assert!(!q.sort[1].descending);
        assert_eq!(q.filter[0].combinator(), Combinator::Or);
        assert_eq!(q.filter[1].combinator(), Combinator::And);
        assert_eq!(q.page, 1);
        assert_eq!(q.size, Some(5));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::Db("boom".into()).kind(), crate::ErrorKind::Query);
        assert_eq!(Error::InvalidPageSize.kind(), crate::ErrorKind::Validation);
        assert_eq!(
            Error::UnknownField("x".into()).kind(),
            crate::ErrorKind::Validation
        );
    }
}
