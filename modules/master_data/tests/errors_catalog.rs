use master_data::errors::ErrorCode;

#[test]
fn error_code_has_correct_status() {
    assert_eq!(ErrorCode::master_data_record_not_found_v1.status(), 404);
    assert_eq!(ErrorCode::master_data_record_conflict_v1.status(), 409);
    assert_eq!(ErrorCode::master_data_record_validation_v1.status(), 400);
    assert_eq!(ErrorCode::master_data_internal_database_v1.status(), 500);
}

#[test]
fn error_code_to_problem_works() {
    let problem = ErrorCode::master_data_record_not_found_v1.to_problem("role 4 not found");

    assert_eq!(problem.status, 404);
    assert_eq!(problem.title, "Record Not Found");
    assert_eq!(problem.code, "master_data.record.not_found.v1");
    assert_eq!(problem.detail, "role 4 not found");
    assert_eq!(
        problem.type_url,
        "https://errors.example.com/master_data.record.not_found.v1"
    );
}

#[test]
fn respond_carries_the_request_path() {
    let resp = ErrorCode::master_data_record_conflict_v1.respond("role 1 already exists", "/m-role");
    assert_eq!(resp.0.status, 409);
    assert_eq!(resp.0.instance, "/m-role");
}

#[test]
fn codes_are_unique_and_statuses_valid() {
    let mut seen = std::collections::HashSet::new();
    for code in ErrorCode::ALL {
        let def = code.def();
        assert!((100..=599).contains(&def.status), "bad status for {}", def.code);
        assert!(seen.insert(def.code), "duplicate code {}", def.code);
        assert!(def.type_url.ends_with(def.code));
    }
}
