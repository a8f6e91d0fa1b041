use bikeshare_stats::calendar::{Month, Weekday};
use bikeshare_stats::config::OutputFormat;
use bikeshare_stats::filters::{City, FilterKind};
use bikeshare_stats::loader::{OptionalColumn, ROUTE_SEPARATOR, TripTable, load};
use bikeshare_stats::pager::{PLACEHOLDER, RowPager};
use bikeshare_stats::session::{LinePrompt, run_session};
use bikeshare_stats::stats::{
    BirthYearStats, Frequency, GenderCounts, TripReports, mode, station_stats, user_stats,
};
use std::io::Cursor;
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_city(city: City, month: Option<Month>, weekday: Option<Weekday>) -> TripTable {
    load(&fixtures(), city.key(), month, weekday).expect("Failed to load fixture")
}

fn indices(table: &TripTable) -> Vec<String> {
    table.iter().filter_map(|r| r.index.clone()).collect()
}

#[test]
fn test_unfiltered_load_keeps_every_row() {
    for city in City::ALL {
        let content = std::fs::read_to_string(fixtures().join(city.file_name())).unwrap();
        let data_rows = content.lines().skip(1).filter(|l| !l.is_empty()).count();

        let table = load_city(city, None, None);
        assert_eq!(table.len(), data_rows, "{city}");
    }
}

#[test]
fn test_derived_fields_are_in_range() {
    for city in City::ALL {
        for record in load_city(city, None, None).iter() {
            assert!((1..=6).contains(&record.month));
            assert!(record.weekday.ordinal() <= 6);
            assert!(record.hour <= 23);
        }
    }
}

#[test]
fn test_month_and_weekday_filters_commute() {
    let combined = load_city(City::Chicago, Some(Month::June), Some(Weekday::Friday));

    let all = load_city(City::Chicago, None, None);
    let weekday_first = all
        .clone()
        .retain_weekday(Weekday::Friday)
        .retain_month(Month::June);
    let month_first = all.retain_month(Month::June).retain_weekday(Weekday::Friday);

    assert_eq!(indices(&combined), vec!["1423854"]);
    assert_eq!(indices(&weekday_first), indices(&combined));
    assert_eq!(indices(&month_first), indices(&combined));
}

#[test]
fn test_filtered_load_preserves_order() {
    let january = load_city(City::Chicago, Some(Month::January), None);
    assert_eq!(indices(&january), vec!["9031", "45207", "65924"]);

    let mondays = load_city(City::Chicago, None, Some(Weekday::Monday));
    assert_eq!(indices(&mondays), vec!["304487", "1473887"]);
}

#[test]
fn test_chicago_full_reports() {
    let table = load_city(City::Chicago, None, None);
    let reports = TripReports::compute(&table, FilterKind::None);

    assert_eq!(reports.rows, 8);
    assert_eq!(reports.time.hour, Frequency::Found { value: 9, count: 2 });
    assert_eq!(
        reports.time.month,
        Some(Frequency::Found { value: 1, count: 3 })
    );
    assert_eq!(
        reports.time.weekday,
        Some(Frequency::Found {
            value: Weekday::Monday,
            count: 2
        })
    );

    assert_eq!(
        reports.station.start_station,
        Frequency::Found {
            value: "Theater on the Lake".to_string(),
            count: 2
        }
    );
    assert_eq!(
        reports.station.end_station,
        Frequency::Found {
            value: "Damen Ave & Chicago Ave".to_string(),
            count: 2
        }
    );
    assert_eq!(
        reports.station.route,
        Frequency::Found {
            value: "Wood St & Hubbard St -> Damen Ave & Chicago Ave".to_string(),
            count: 2
        }
    );

    assert_eq!(reports.duration.total, 4821.0);
    assert_eq!(reports.duration.count, 8);
    assert_eq!(reports.duration.mean, Some(602.625));

    assert_eq!(reports.user.subscribers, 6);
    assert_eq!(reports.user.customers, 2);
    assert_eq!(reports.user.gender, Some(GenderCounts { male: 5, female: 1 }));
    assert_eq!(
        reports.user.birth_year,
        Some(BirthYearStats {
            earliest: Some(1975),
            latest: Some(1992),
            most_common: Frequency::Found {
                value: 1992,
                count: 2
            },
        })
    );
}

#[test]
fn test_washington_has_no_demographics() {
    let table = load_city(City::Washington, None, None);
    assert!(!table.has_column(OptionalColumn::Gender));
    assert!(!table.has_column(OptionalColumn::BirthYear));

    let report = user_stats(&table, FilterKind::None);
    assert_eq!(report.subscribers, 5);
    assert_eq!(report.customers, 2);
    assert!(report.gender.is_none());
    assert!(report.birth_year.is_none());
}

#[test]
fn test_new_york_city_counts_known_genders_only() {
    let table = load_city(City::NewYorkCity, None, None);
    let report = user_stats(&table, FilterKind::None);
    assert_eq!(report.gender, Some(GenderCounts { male: 3, female: 1 }));
    assert_eq!(report.birth_year.unwrap().earliest, Some(1981));
}

#[test]
fn test_route_round_trip() {
    for city in City::ALL {
        let table = load_city(city, None, None);
        let manual = mode(table.iter().filter_map(|r| {
            Some(format!(
                "{}{ROUTE_SEPARATOR}{}",
                r.start_station.as_ref()?,
                r.end_station.as_ref()?
            ))
        }));
        assert_eq!(station_stats(&table, FilterKind::None).route, manual, "{city}");
    }
}

#[test]
fn test_empty_filter_combination_reports_no_data() {
    // No Monday trips in January in the fixture
    let table = load_city(City::Chicago, Some(Month::January), Some(Weekday::Monday));
    assert!(table.is_empty());

    let reports = TripReports::compute(&table, FilterKind::Both);
    assert_eq!(reports.time.hour, Frequency::NoData);
    assert_eq!(reports.station.start_station, Frequency::NoData);
    assert_eq!(reports.station.end_station, Frequency::NoData);
    assert_eq!(reports.station.route, Frequency::NoData);
    assert_eq!(reports.duration.mean, None);
    assert_eq!(
        reports.user.birth_year.map(|b| b.most_common),
        Some(Frequency::NoData)
    );

    let page = RowPager::new(&table).next_page();
    assert!(page.rows.is_empty());
    assert!(!page.more_remaining);
}

#[test]
fn test_pager_walks_washington() {
    let table = load_city(City::Washington, None, None);
    let mut pager = RowPager::new(&table);

    let first = pager.next_page();
    assert_eq!(first.rows.len(), 5);
    assert!(first.more_remaining);
    assert_eq!(first.rows[2].get("End Station"), Some(PLACEHOLDER));
    assert_eq!(first.rows[0].get("Gender"), None);

    let second = pager.next_page();
    assert_eq!(second.rows.len(), 2);
    assert!(!second.more_remaining);
    assert_eq!(second.rows[1].get(""), Some("66671"));

    let third = pager.next_page();
    assert!(third.rows.is_empty());
    assert!(!third.more_remaining);
}

#[test]
fn test_session_month_filter_end_to_end() {
    let script = "chicago\nmonth\njanuary\nyes\nno\n";
    let mut prompt = LinePrompt::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    let mut out = Vec::new();

    run_session(&mut prompt, &mut out, &fixtures(), OutputFormat::Pretty).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(!out.contains("Most popular month"));
    assert!(out.contains("Most popular day of week: Tuesday, Count: 1"));
    assert!(out.contains("Most popular hour: 14, Count: 2, Filter: month"));
    assert!(out.contains("Earliest Birth Year: 1975"));
    assert!(out.contains("\"\" : 9031,"));
    assert!(out.contains("Gender: no information,"));

    let shown = String::from_utf8(prompt.into_output()).unwrap();
    assert!(shown.contains("No more entries to show."));
}

#[test]
fn test_session_restart_runs_second_cycle() {
    let script = "washington\nnone\nno\nyes\nchicago\nboth\njanuary\nmonday\nno\nno\n";
    let mut prompt = LinePrompt::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    let mut out = Vec::new();

    run_session(&mut prompt, &mut out, &fixtures(), OutputFormat::Pretty).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Subscribers: 5, Customers: 2, Filter: none"));
    assert!(out.contains("Most popular hour: no data, Filter: both"));
}

#[test]
fn test_session_json_format() {
    let script = "new york city\nnone\nno\nno\n";
    let mut prompt = LinePrompt::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    let mut out = Vec::new();

    run_session(&mut prompt, &mut out, &fixtures(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value["rows"], 5);
    assert_eq!(value["user"]["gender"]["male"], 3);
}
