use josaa_predictor::predictor::{
    by_program, evaluate, filter, AllotmentRecord, ClosingRank, FeeDetails, Quota, ResultSet,
    Round, SearchCriteria, SortDirection,
};

fn record(
    seat_type: &str,
    gender: &str,
    state: &str,
    quota: &str,
    closing: &str,
    program: &str,
) -> AllotmentRecord {
    AllotmentRecord {
        institute: format!("Institute in {state}"),
        program: program.to_string(),
        seat_type: seat_type.to_string(),
        gender: gender.to_string(),
        institute_state: state.to_string(),
        quota: Quota::from_code(quota),
        closing_rank: ClosingRank::parse(Some(closing.to_string())),
        fees: FeeDetails::default(),
    }
}

fn criteria(rank: u32, category: &str, gender: &str, home_state: &str) -> SearchCriteria {
    SearchCriteria::new(
        "Test Applicant",
        rank,
        category,
        gender,
        home_state,
        Round::new(1).expect("valid round"),
    )
    .expect("valid criteria")
}

/// Every combination of the values the predicate looks at.
fn grid() -> Vec<AllotmentRecord> {
    let mut rows = Vec::new();
    for seat_type in ["OPEN", "OBC-NCL"] {
        for gender in ["Male", "Female-only (including Supernumerary)"] {
            for state in ["Delhi", "delhi", "Punjab"] {
                for quota in ["HS", "OS", "AI", "GO"] {
                    for closing in ["150", "400", "401", "1234P", "abc", ""] {
                        rows.push(record(seat_type, gender, state, quota, closing, "CSE"));
                    }
                }
            }
        }
    }
    rows
}

fn satisfies_conditions(row: &AllotmentRecord, criteria: &SearchCriteria) -> bool {
    let rank_ok = matches!(row.closing_rank.value, Some(closing) if i64::from(criteria.rank) <= closing);
    let same_state = row.institute_state.to_lowercase() == criteria.home_state.to_lowercase();
    let quota_ok = match row.quota.code() {
        "HS" => same_state,
        "OS" => !same_state,
        "AI" => true,
        _ => false,
    };
    rank_ok && row.seat_type == criteria.category && row.gender == criteria.gender && quota_ok
}

#[test]
fn home_state_seat_within_cutoff_is_predicted() {
    let dataset = vec![
        record("OPEN", "Male", "Delhi", "HS", "500", "CSE"),
        record("OPEN", "Male", "Punjab", "OS", "300", "ECE"),
    ];

    let results = filter(&dataset, &criteria(400, "OPEN", "Male", "Delhi"));
    assert_eq!(results, vec![dataset[0].clone()]);
}

#[test]
fn unparseable_closing_rank_is_never_predicted() {
    let dataset = vec![record("OPEN", "Male", "Delhi", "AI", "abc", "CSE")];
    assert!(filter(&dataset, &criteria(200, "OPEN", "Male", "Delhi")).is_empty());
}

#[test]
fn filter_is_sound_and_complete_over_the_grid() {
    let dataset = grid();
    for rank in [1, 150, 400, 401, 1234, 5000] {
        for home_state in ["Delhi", "DELHI", "Punjab", "Kerala"] {
            let criteria = criteria(rank, "OPEN", "Male", home_state);
            let results = filter(&dataset, &criteria);

            assert!(results.iter().all(|row| satisfies_conditions(row, &criteria)));

            let expected: Vec<&AllotmentRecord> = dataset
                .iter()
                .filter(|row| satisfies_conditions(row, &criteria))
                .collect();
            let actual: Vec<&AllotmentRecord> = results.iter().collect();
            assert_eq!(actual, expected, "rank {rank}, home state {home_state}");
        }
    }
}

#[test]
fn filtering_filtered_rows_again_changes_nothing() {
    let dataset = grid();
    let criteria = criteria(400, "OPEN", "Male", "Delhi");
    let once = filter(&dataset, &criteria);
    assert!(!once.is_empty());
    assert!(once.iter().all(|row| evaluate(row, &criteria).is_eligible()));
    assert_eq!(filter(&once, &criteria), once);
}

#[test]
fn preparatory_rank_suffix_is_read_as_number() {
    let dataset = vec![record("OPEN", "Male", "Punjab", "OS", "1234P", "CSE")];
    assert_eq!(filter(&dataset, &criteria(1234, "OPEN", "Male", "Delhi")).len(), 1);
    assert!(filter(&dataset, &criteria(1235, "OPEN", "Male", "Delhi")).is_empty());
}

#[test]
fn two_toggles_restore_direction() {
    let dataset = vec![
        record("OPEN", "Male", "Delhi", "AI", "900", "CSE"),
        record("OPEN", "Male", "Delhi", "AI", "450", "ECE"),
        record("OPEN", "Male", "Delhi", "AI", "700", "CSE"),
    ];
    let mut results = ResultSet::new(filter(&dataset, &criteria(100, "OPEN", "Male", "Delhi")));
    let original = results.direction();

    results.toggle_sort();
    results.toggle_sort();
    assert_eq!(results.direction(), original);
    assert_eq!(original, SortDirection::Ascending);

    let ranks: Vec<Option<i64>> = results
        .rows()
        .iter()
        .map(|row| row.closing_rank.value)
        .collect();
    assert_eq!(ranks, vec![Some(450), Some(700), Some(900)]);
}

#[test]
fn program_view_is_subset_of_filtered_rows() {
    let dataset = vec![
        record("OPEN", "Male", "Delhi", "AI", "900", "Civil Engineering"),
        record("OPEN", "Male", "Delhi", "AI", "450", "Chemical Engineering"),
        record("OPEN", "Male", "Delhi", "AI", "700", "Civil Engineering"),
    ];
    let rows = filter(&dataset, &criteria(100, "OPEN", "Male", "Delhi"));

    let everything = by_program(&rows, None);
    assert_eq!(everything.len(), rows.len());

    let civil = by_program(&rows, Some("Civil Engineering"));
    assert_eq!(civil.len(), 2);
    assert!(civil.iter().all(|row| row.program == "Civil Engineering"));
    assert!(civil.iter().all(|row| rows.contains(row)));

    let results = ResultSet::new(rows);
    assert_eq!(
        results.program_options(),
        vec![
            "Chemical Engineering".to_string(),
            "Civil Engineering".to_string()
        ]
    );
}
