use chrono::NaiveDate;
use rusqlite::{Connection, Row};

use nabavka_filter::collection::{MemoryCollection, QueryableCollection};
use nabavka_filter::persist::{create_tables, SqliteCollection};
use nabavka_filter::procurement::{
    Article, Calculation, CalculationKind, Conversion, Location, PurchaseCost, ARTICLE, CALCULATION, CONVERSION,
    LOCATION, PURCHASE_COST,
};
use nabavka_filter::schema::EntitySchema;
use nabavka_filter::settings::Settings;
use nabavka_filter::value::Decimal;
use nabavka_filter::{FilterClause, FilterError, PredicateComposer, RawValue};

const ROWS: &str = r#"
INSERT INTO location (id, name, address) VALUES
    (1, 'Magacin', 'Mite Ruzica 3'),
    (2, 'Lokacija 2', 'Knez Mihailova 6');
INSERT INTO conversion (id, number, date, currency, supplier_id, total, location_id) VALUES
    (1, 'T13452', '2022-01-10', 'RSD', 1, 42.5, 1),
    (2, 'T13453', '2022-02-15', 'USD', 2, 100.0, 2),
    (3, 'K-7', '2021-12-31', 'RSD', 1, 24.5, NULL),
    (4, 'T2000', '2022-03-01', 'EUR', 3, 200, 1);
INSERT INTO purchase_cost (id, name, price, conversion_id) VALUES
    (1, 'Trosak1', 24.0, 1),
    (2, 'TR1', 23.4, 2),
    (3, 'Carina', 100.5, 3);
INSERT INTO calculation (id, number, booked_at, currency, kind, total, closed, location_id) VALUES
    (1, 'AA21', '2022-01-31 08:30:00', 'RSD', 'RETAIL', 3.5, 0, 1),
    (2, 'AA21MB', '2022-02-01 12:00:00', 'USD', 'WHOLESALE', 24.25, 1, 2);
INSERT INTO article (id, code, name, unit, quantity, purchase_price, discount_percent, calculation_id) VALUES
    (1, '14412AB', 'Carape', 'Komad', 1, 200.0, 2.0, 1),
    (2, '14412AB13', 'Majica', 'Komad', 5, 42.25, NULL, 2),
    (3, 'X1', 'Kapa', 'Par', 3, 23.5, NULL, NULL);
"#;

struct Fixture {
    connection: Connection,
    conversions: MemoryCollection<Conversion>,
    costs: MemoryCollection<PurchaseCost>,
    calculations: MemoryCollection<Calculation>,
    articles: MemoryCollection<Article>,
}

fn decimal(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

fn location(id: i64) -> Location {
    match id {
        1 => Location { id, name: "Magacin".into(), address: "Mite Ruzica 3".into() },
        _ => Location { id, name: "Lokacija 2".into(), address: "Knez Mihailova 6".into() },
    }
}

fn conversion(id: i64, number: &str, (y, m, d): (i32, u32, u32), currency: &str, supplier_id: i64, total: &str, location_id: Option<i64>) -> Conversion {
    Conversion {
        id,
        number: number.into(),
        date: NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
        currency: currency.into(),
        supplier_id,
        total: decimal(total),
        location: location_id.map(location),
    }
}

fn calculation(id: i64) -> Calculation {
    match id {
        1 => Calculation {
            id,
            number: "AA21".into(),
            date: NaiveDate::from_ymd_opt(2022, 1, 31).and_then(|d| d.and_hms_opt(8, 30, 0)).expect("valid date"),
            currency: "RSD".into(),
            kind: CalculationKind::Retail,
            total: decimal("3.5"),
            closed: false,
            location: Some(location(1)),
        },
        _ => Calculation {
            id,
            number: "AA21MB".into(),
            date: NaiveDate::from_ymd_opt(2022, 2, 1).and_then(|d| d.and_hms_opt(12, 0, 0)).expect("valid date"),
            currency: "USD".into(),
            kind: CalculationKind::Wholesale,
            total: decimal("24.25"),
            closed: true,
            location: Some(location(2)),
        },
    }
}

fn setup() -> Fixture {
    nabavka_filter::logging::init(&Settings::default());
    let connection = Connection::open_in_memory().expect("in-memory database");
    create_tables(&connection, &[&LOCATION, &CONVERSION, &PURCHASE_COST, &CALCULATION, &ARTICLE]).expect("tables created");
    connection.execute_batch(ROWS).expect("rows inserted");

    let stored = vec![
        conversion(1, "T13452", (2022, 1, 10), "RSD", 1, "42.5", Some(1)),
        conversion(2, "T13453", (2022, 2, 15), "USD", 2, "100.0", Some(2)),
        conversion(3, "K-7", (2021, 12, 31), "RSD", 1, "24.5", None),
        conversion(4, "T2000", (2022, 3, 1), "EUR", 3, "200", Some(1)),
    ];
    let costs = [("Trosak1", "24.0"), ("TR1", "23.4"), ("Carina", "100.5")]
        .into_iter()
        .zip(&stored)
        .map(|((name, price), conversion)| PurchaseCost {
            id: conversion.id,
            name: name.into(),
            price: decimal(price),
            conversion: Some(conversion.clone()),
        })
        .collect();
    let conversions = MemoryCollection::new(stored);
    let calculations = MemoryCollection::new(vec![calculation(1), calculation(2)]);
    let articles = MemoryCollection::new(vec![
        Article {
            id: 1,
            code: "14412AB".into(),
            name: "Carape".into(),
            unit: "Komad".into(),
            quantity: 1,
            purchase_price: decimal("200.0"),
            discount_percent: Some(decimal("2.0")),
            calculation: Some(calculation(1)),
        },
        Article {
            id: 2,
            code: "14412AB13".into(),
            name: "Majica".into(),
            unit: "Komad".into(),
            quantity: 5,
            purchase_price: decimal("42.25"),
            discount_percent: None,
            calculation: Some(calculation(2)),
        },
        Article {
            id: 3,
            code: "X1".into(),
            name: "Kapa".into(),
            unit: "Par".into(),
            quantity: 3,
            purchase_price: decimal("23.5"),
            discount_percent: None,
            calculation: None,
        },
    ]);
    Fixture { connection, conversions, costs, calculations, articles }
}

fn row_id(row: &Row<'_>) -> rusqlite::Result<i64> {
    row.get("id")
}

/// Runs the clauses against both collections and returns the matching ids
/// once they are known to agree.
fn search<E, M>(
    fixture: &Fixture,
    memory: &M,
    schema: &'static EntitySchema,
    id_of: fn(&E) -> i64,
    clauses: &[(&str, &str, RawValue)],
) -> Vec<i64>
where
    M: QueryableCollection<Entity = E>,
{
    let composer: PredicateComposer =
        clauses.iter().map(|(path, token, raw)| FilterClause::new(*path, *token, raw.clone())).collect();
    let predicate = composer.build(schema).expect("clauses compile");

    let in_memory: Vec<i64> = memory.find_matching(predicate.as_ref()).expect("memory query").iter().map(id_of).collect();
    let stored = SqliteCollection::new(&fixture.connection, schema, row_id)
        .find_matching(predicate.as_ref())
        .expect("sqlite query");
    assert_eq!(in_memory, stored, "backends disagree on {:?}", clauses);
    stored
}

fn conversions(fixture: &Fixture, clauses: &[(&str, &str, RawValue)]) -> Vec<i64> {
    search(fixture, &fixture.conversions, &CONVERSION, |c: &Conversion| c.id, clauses)
}

fn costs(fixture: &Fixture, clauses: &[(&str, &str, RawValue)]) -> Vec<i64> {
    search(fixture, &fixture.costs, &PURCHASE_COST, |c: &PurchaseCost| c.id, clauses)
}

fn calculations(fixture: &Fixture, clauses: &[(&str, &str, RawValue)]) -> Vec<i64> {
    search(fixture, &fixture.calculations, &CALCULATION, |c: &Calculation| c.id, clauses)
}

fn articles(fixture: &Fixture, clauses: &[(&str, &str, RawValue)]) -> Vec<i64> {
    search(fixture, &fixture.articles, &ARTICLE, |a: &Article| a.id, clauses)
}

#[test]
fn no_clauses_selects_every_row() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[]), vec![1, 2, 3, 4]);
    assert_eq!(articles(&fixture, &[]), vec![1, 2, 3]);
}

#[test]
fn equality_and_negation() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[("currency", "=", "RSD".into())]), vec![1, 3]);
    assert_eq!(conversions(&fixture, &[("currency", "!=", "RSD".into())]), vec![2, 4]);
    assert_eq!(conversions(&fixture, &[("currency", "<>", "RSD".into())]), vec![2, 4]);
    assert_eq!(conversions(&fixture, &[("currency", "=", "RSD".into()), ("total", ">", 30.into())]), vec![1]);
}

#[test]
fn ordering_on_numbers_and_dates() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[("total", "<=", "42.5".into())]), vec![1, 3]);
    assert_eq!(conversions(&fixture, &[("total", "ge", 100.into())]), vec![2, 4]);
    assert_eq!(conversions(&fixture, &[("date", ">=", "2022-01-01".into())]), vec![1, 2, 4]);
    assert_eq!(conversions(&fixture, &[("date", "!<", "2022-02-15".into())]), vec![2, 4]);
    assert_eq!(calculations(&fixture, &[("date", "<", "2022-02-01T00:00:00".into())]), vec![1]);
}

#[test]
fn like_and_membership() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[("conversionNumber", "~", "T1".into())]), vec![1, 2]);
    assert_eq!(conversions(&fixture, &[("conversionNumber", "like", "T%3".into())]), vec![2]);
    assert_eq!(conversions(&fixture, &[("conversionNumber", "like", "t1%".into())]), Vec::<i64>::new());
    assert_eq!(conversions(&fixture, &[("conversionNumber", "not like", "T_3%".into())]), vec![3, 4]);
    assert_eq!(conversions(&fixture, &[("supplierId", "in", "1,3".into())]), vec![1, 3, 4]);
    assert_eq!(conversions(&fixture, &[("supplierId", "!in", vec![1].into())]), vec![2, 4]);
}

#[test]
fn related_attributes_follow_joins() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[("location.name", "=", "Magacin".into())]), vec![1, 4]);
    // conversion 3 has no location, so the comparison is unknown either way
    assert_eq!(conversions(&fixture, &[("location.name", "!=", "Magacin".into())]), vec![2]);
    assert_eq!(articles(&fixture, &[("calculation.location.name", "=", "Lokacija 2".into())]), vec![2]);
    assert_eq!(
        articles(&fixture, &[("calculation.currency", "=", "RSD".into()), ("calculation.location.address", "~", "Ruzica".into())]),
        vec![1]
    );
}

#[test]
fn purchase_costs_through_their_conversion() {
    let fixture = setup();
    assert_eq!(costs(&fixture, &[("conversion.currency", "=", "RSD".into())]), vec![1, 3]);
    assert_eq!(costs(&fixture, &[("conversion.location.name", "=", "Magacin".into())]), vec![1]);
    assert_eq!(costs(&fixture, &[("price", "<", 24.into())]), vec![2]);
}

#[test]
fn decimal_operands_agree_or_are_rejected() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[("total", "=", "42.500000000".into())]), vec![1]);
    assert_eq!(conversions(&fixture, &[("total", "<", "42.5".into())]), vec![3]);
    for token in ["<", "="] {
        let mut composer = PredicateComposer::new();
        composer.with_clause("total", token, "42.50000000000000001");
        let err = composer.build(&CONVERSION).unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { ref path, .. } if path == "total"), "{token}: {err}");
    }
}

#[test]
fn oversized_like_patterns_are_rejected_up_front() {
    let fixture = setup();
    assert_eq!(conversions(&fixture, &[("conversionNumber", "like", "T____2".into())]), vec![1]);
    let mut composer = PredicateComposer::new();
    composer.with_clause("conversionNumber", "like", "_".repeat(30_000));
    assert!(matches!(composer.build(&CONVERSION), Err(FilterError::TypeMismatch { .. })));
}

#[test]
fn booleans_and_enumerations() {
    let fixture = setup();
    assert_eq!(calculations(&fixture, &[("closed", "=", false.into())]), vec![1]);
    assert_eq!(calculations(&fixture, &[("closed", "=", "true".into())]), vec![2]);
    assert_eq!(calculations(&fixture, &[("calculationKind", "=", "WHOLESALE".into())]), vec![2]);
    assert_eq!(calculations(&fixture, &[("calculationKind", "in", "RETAIL,WHOLESALE".into())]), vec![1, 2]);
}

#[test]
fn missing_values_never_match() {
    let fixture = setup();
    assert_eq!(articles(&fixture, &[("discountPercent", ">", 1.into())]), vec![1]);
    assert_eq!(articles(&fixture, &[("discountPercent", "!>", 1.into())]), Vec::<i64>::new());
    assert_eq!(articles(&fixture, &[("unit", "=", "Komad".into()), ("quantity", ">=", 2.into())]), vec![2]);
}

#[test]
fn mapped_rows_carry_the_stored_columns() {
    let fixture = setup();
    let mut composer = PredicateComposer::new();
    composer.with_clause("address", "~", "Mihailova");
    let predicate = composer.build(&LOCATION).expect("clauses compile");
    let found = SqliteCollection::new(&fixture.connection, &LOCATION, |row| {
        Ok(Location { id: row.get("id")?, name: row.get("name")?, address: row.get("address")? })
    })
    .find_matching(predicate.as_ref())
    .expect("sqlite query");
    assert_eq!(found, vec![location(2)]);
}
