use std::collections::HashMap;

use serde::Serialize;

#[derive(Serialize)]
struct BalanceRow {
    participant: &'static str,
    balance: &'static str,
}

#[derive(Serialize)]
struct SettlementRow {
    from: &'static str,
    to: &'static str,
    amount: &'static str,
}

fn to_csv<T: Serialize>(header: &str, rows: Vec<T>) -> String {
    if rows.is_empty() {
        return format!("{}\n", header);
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    for r in rows {
        wtr.serialize(r).unwrap();
    }
    wtr.flush().unwrap();
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

// Only used during testing so no need to return result
pub fn create_balances_csv(rows: Vec<[&'static str; 2]>) -> String {
    let rows: Vec<BalanceRow> = rows
        .into_iter()
        .map(|r| BalanceRow {
            participant: r[0],
            balance: r[1],
        })
        .collect();
    to_csv("participant,balance", rows)
}

pub fn create_settlements_csv(rows: Vec<[&'static str; 3]>) -> String {
    let rows: Vec<SettlementRow> = rows
        .into_iter()
        .map(|r| SettlementRow {
            from: r[0],
            to: r[1],
            amount: r[2],
        })
        .collect();
    to_csv("from,to,amount", rows)
}

fn count_rows(csv: &str) -> HashMap<&str, usize> {
    csv.lines()
        .skip(1) // ignore row titles
        .filter(|line| !line.is_empty())
        .fold(HashMap::new(), |mut acc, line| {
            *acc.entry(line).or_insert(0) += 1;
            acc
        })
}

// Transfers between tied participants may come out in either order. This compares the rows as
// a multiset so tests are not tied to a tie-break rule.
pub fn assert_unsorted_eq(s1: &str, s2: &str) {
    assert_eq!(s1.lines().next(), s2.lines().next(), "csv headers differ");

    let sut1 = count_rows(s1);
    let sut2 = count_rows(s2);
    if sut1.len() != sut2.len() {
        panic!("csvs do not contain the same number of distinct rows");
    }

    sut1.iter().for_each(|(row, count)| match sut2.get(row) {
        Some(other) => assert_eq!(count, other, "row {} appears a different number of times", row),
        None => panic!("row {} not found in both csvs", row),
    })
}
