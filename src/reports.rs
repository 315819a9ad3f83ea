use crate::catalog::{
    age_bucket, age_bucket_order, cause_description, month_name, sex_label, UNKNOWN_LABEL,
};
use crate::error::ReportError;
use crate::loader::Dataset;
use crate::types::{
    AgeGroupRow, CauseRow, DepartmentTotalRow, LowMortalityRow, MonthlyTotalRow,
    SexDepartmentRow, Summary, ViolentMunicipalityRow,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Municipalities with fewer deaths than this are left out of the
/// low-mortality ranking.
pub const LOW_MORTALITY_MIN_DEATHS: usize = 5;

/// Count occurrences per key. Keys come back in ascending order, which is the
/// tie-break order for every ranking below.
fn count_by<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut map: BTreeMap<K, usize> = BTreeMap::new();
    for k in keys {
        *map.entry(k).or_insert(0) += 1;
    }
    map.into_iter().collect()
}

/// The `n` largest counts; the sort is stable so equal counts keep key order.
fn largest<K>(mut counts: Vec<(K, usize)>, n: usize) -> Vec<(K, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

fn smallest<K>(mut counts: Vec<(K, usize)>, n: usize) -> Vec<(K, usize)> {
    counts.sort_by(|a, b| a.1.cmp(&b.1));
    counts.truncate(n);
    counts
}

/// Deaths per department, ordered by department code. Rows without a
/// department code are kept in a leading blank-named row.
pub fn department_totals(data: &Dataset) -> Vec<DepartmentTotalRow> {
    count_by(data.mortality.iter().map(|r| r.dept_code))
        .into_iter()
        .map(|(dept, deaths)| DepartmentTotalRow {
            department: dept.and_then(|d| data.divipola.department_name(d)),
            deaths,
        })
        .collect()
}

/// Deaths per month in calendar order; months outside 1..=12 (or missing)
/// are pooled into a trailing `Desconocido` row.
pub fn monthly_totals(data: &Dataset) -> Vec<MonthlyTotalRow> {
    const UNKNOWN_MONTH: i32 = 13;
    let keys = data.mortality.iter().map(|r| match r.month {
        Some(m) if (1..=12).contains(&m) => m,
        _ => UNKNOWN_MONTH,
    });
    count_by(keys)
        .into_iter()
        .map(|(m, deaths)| MonthlyTotalRow {
            month: month_name(Some(m)).unwrap_or(UNKNOWN_LABEL).to_string(),
            deaths,
        })
        .collect()
}

/// The five municipalities with the most homicides (cause codes starting
/// with `X95`).
pub fn top_violent_municipalities(data: &Dataset) -> Vec<ViolentMunicipalityRow> {
    let keys = data
        .mortality
        .iter()
        .filter(|r| r.is_homicide())
        .filter_map(|r| r.municipality_key());
    largest(count_by(keys), 5)
        .into_iter()
        .map(|((dept, munic), homicides)| ViolentMunicipalityRow {
            municipality: data.divipola.municipality_name(dept, munic),
            homicides,
        })
        .collect()
}

/// The ten municipalities with the fewest deaths, ignoring those under
/// [`LOW_MORTALITY_MIN_DEATHS`].
pub fn lowest_mortality_municipalities(data: &Dataset) -> Vec<LowMortalityRow> {
    let counts: Vec<((u32, u32), usize)> =
        count_by(data.mortality.iter().filter_map(|r| r.municipality_key()))
            .into_iter()
            .filter(|(_, deaths)| *deaths >= LOW_MORTALITY_MIN_DEATHS)
            .collect();
    smallest(counts, 10)
        .into_iter()
        .map(|((dept, munic), deaths)| LowMortalityRow {
            municipality: data.divipola.municipality_name(dept, munic),
            deaths,
        })
        .collect()
}

/// The ten most frequent cause codes with their catalog description. Rows
/// without a cause code are not ranked.
pub fn top_causes(data: &Dataset) -> Vec<CauseRow> {
    let keys = data.mortality.iter().filter_map(|r| r.cause_code.as_deref());
    largest(count_by(keys), 10)
        .into_iter()
        .map(|(code, total)| CauseRow {
            code: code.to_string(),
            description: cause_description(code).to_string(),
            total,
        })
        .collect()
}

/// Deaths per (department, sex), ordered by department code then sex code.
/// Unknown sex codes share one `Desconocido` segment per department.
pub fn sex_by_department(data: &Dataset) -> Vec<SexDepartmentRow> {
    let keys = data.mortality.iter().map(|r| {
        let sex = match r.sex {
            Some(s @ 1..=3) => s,
            _ => 4,
        };
        (r.dept_code, sex)
    });
    count_by(keys)
        .into_iter()
        .map(|((dept, sex), deaths)| SexDepartmentRow {
            department: dept.and_then(|d| data.divipola.department_name(d)),
            sex: sex_label(Some(sex)).to_string(),
            deaths,
        })
        .collect()
}

/// Deaths per life-stage bucket, most frequent first. Fails on a missing
/// age-group code or one outside 0..=29.
pub fn age_group_distribution(data: &Dataset) -> Result<Vec<AgeGroupRow>, ReportError> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for (row, r) in data.mortality.iter().enumerate() {
        let code = r.age_group.ok_or(ReportError::MissingAgeGroup { row })?;
        let bucket = age_bucket(code).ok_or(ReportError::UnknownAgeGroup { code })?;
        *counts.entry(bucket).or_insert(0) += 1;
    }
    let ordered: Vec<(&'static str, usize)> = age_bucket_order()
        .iter()
        .filter_map(|b| counts.get(b).map(|c| (*b, *c)))
        .collect();
    Ok(largest(ordered, usize::MAX)
        .into_iter()
        .map(|(group, deaths)| AgeGroupRow {
            group: group.to_string(),
            deaths,
        })
        .collect())
}

pub fn generate_summary(data: &Dataset) -> Summary {
    let years: BTreeSet<i32> = data.mortality.iter().filter_map(|r| r.year).collect();
    let departments: HashSet<u32> = data.mortality.iter().filter_map(|r| r.dept_code).collect();
    let municipalities: HashSet<(u32, u32)> = data
        .mortality
        .iter()
        .filter_map(|r| r.municipality_key())
        .collect();
    let homicide_records = data.mortality.iter().filter(|r| r.is_homicide()).count();
    Summary {
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        years: years.into_iter().collect(),
        total_records: data.mortality.len(),
        incomplete_rows: data.load_report.incomplete_rows,
        total_departments: departments.len(),
        total_municipalities: municipalities.len(),
        cause_code_catalog_rows: data.cause_codes.len(),
        homicide_records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UNSPECIFIED_CAUSE;
    use crate::lookup::DivisionLookup;
    use crate::types::MortalityRecord;

    fn rec(dept: u32, munic: u32, cause: &str) -> MortalityRecord {
        MortalityRecord {
            dept_code: Some(dept),
            munic_code: Some(munic),
            year: Some(2019),
            month: Some(1),
            cause_code: Some(cause.to_string()),
            sex: Some(1),
            age_group: Some(20),
        }
    }

    fn lookup() -> DivisionLookup {
        let mut l = DivisionLookup::default();
        l.insert_department(5, "ANTIOQUIA");
        l.insert_department(11, "BOGOTÁ, D.C.");
        l.insert_municipality(5, 1, "MEDELLÍN");
        l.insert_municipality(5, 2, "ABEJORRAL");
        l.insert_municipality(11, 1, "BOGOTÁ, D.C.");
        l
    }

    fn dataset(mortality: Vec<MortalityRecord>) -> Dataset {
        Dataset {
            mortality,
            divipola: lookup(),
            ..Dataset::default()
        }
    }

    #[test]
    fn three_row_scenario() {
        let data = dataset(vec![rec(5, 1, "X951"), rec(5, 1, "X951"), rec(11, 1, "I219")]);

        assert_eq!(
            top_violent_municipalities(&data),
            vec![ViolentMunicipalityRow {
                municipality: Some("MEDELLÍN".into()),
                homicides: 2
            }]
        );
        assert_eq!(
            top_causes(&data),
            vec![
                CauseRow {
                    code: "X951".into(),
                    description: UNSPECIFIED_CAUSE.into(),
                    total: 2
                },
                CauseRow {
                    code: "I219".into(),
                    description: "Infarto agudo del miocardio".into(),
                    total: 1
                },
            ]
        );
    }

    #[test]
    fn department_totals_sum_to_record_count_and_keep_join_misses() {
        let data = dataset(vec![
            rec(11, 1, "I64"),
            rec(5, 1, "I64"),
            rec(5, 2, "I64"),
            rec(99, 1, "I64"),
        ]);
        let rows = department_totals(&data);
        assert_eq!(
            rows,
            vec![
                DepartmentTotalRow { department: Some("ANTIOQUIA".into()), deaths: 2 },
                DepartmentTotalRow { department: Some("BOGOTÁ, D.C.".into()), deaths: 1 },
                DepartmentTotalRow { department: None, deaths: 1 },
            ]
        );
        assert_eq!(rows.iter().map(|r| r.deaths).sum::<usize>(), data.mortality.len());
    }

    #[test]
    fn rows_missing_a_code_still_count_where_their_key_is_present() {
        let mut no_munic = rec(5, 1, "X951");
        no_munic.munic_code = None;
        let mut no_age = rec(5, 1, "I64");
        no_age.age_group = None;
        let mut no_cause = rec(5, 1, "I64");
        no_cause.cause_code = None;
        let mut no_dept = rec(5, 1, "I64");
        no_dept.dept_code = None;
        let data = dataset(vec![rec(5, 1, "X951"), no_munic, no_age, no_cause, no_dept]);

        assert_eq!(
            department_totals(&data),
            vec![
                DepartmentTotalRow { department: None, deaths: 1 },
                DepartmentTotalRow { department: Some("ANTIOQUIA".into()), deaths: 4 },
            ]
        );
        assert_eq!(monthly_totals(&data)[0].deaths, 5);
        assert_eq!(
            top_violent_municipalities(&data),
            vec![ViolentMunicipalityRow { municipality: Some("MEDELLÍN".into()), homicides: 1 }]
        );
        let sexes: usize = sex_by_department(&data).iter().map(|r| r.deaths).sum();
        assert_eq!(sexes, 5);
        assert_eq!(
            age_group_distribution(&data),
            Err(ReportError::MissingAgeGroup { row: 2 })
        );
    }

    #[test]
    fn top_causes_skips_blank_codes() {
        let mut blank = rec(5, 1, "I64");
        blank.cause_code = None;
        let data = dataset(vec![blank.clone(), blank, rec(5, 1, "I64")]);
        assert_eq!(
            top_causes(&data),
            vec![CauseRow {
                code: "I64".into(),
                description: "Accidente cerebrovascular".into(),
                total: 1
            }]
        );
    }

    #[test]
    fn monthly_totals_in_calendar_order_with_unknown_last() {
        let mut rows = Vec::new();
        for month in [Some(3), Some(1), Some(3), Some(13), None, Some(12)] {
            let mut r = rec(5, 1, "I64");
            r.month = month;
            rows.push(r);
        }
        let out = monthly_totals(&dataset(rows));
        let labels: Vec<(&str, usize)> = out.iter().map(|r| (r.month.as_str(), r.deaths)).collect();
        assert_eq!(
            labels,
            vec![("Enero", 1), ("Marzo", 2), ("Diciembre", 1), ("Desconocido", 2)]
        );
    }

    #[test]
    fn top_violent_limits_to_five_descending() {
        let mut rows = Vec::new();
        for munic in 1..=7u32 {
            for _ in 0..munic {
                rows.push(rec(5, munic, "X950"));
            }
        }
        rows.push(rec(5, 1, "I64"));
        rows.push(rec(5, 1, "X85"));
        let data = dataset(rows);
        let out = top_violent_municipalities(&data);
        let counts: Vec<usize> = out.iter().map(|r| r.homicides).collect();
        assert_eq!(counts, vec![7, 6, 5, 4, 3]);
        assert_eq!(out[0].municipality, None);
    }

    #[test]
    fn top_violent_ties_keep_key_order() {
        let data = dataset(vec![rec(11, 1, "X95"), rec(5, 2, "X959"), rec(5, 1, "X950")]);
        let names: Vec<Option<String>> = top_violent_municipalities(&data)
            .into_iter()
            .map(|r| r.municipality)
            .collect();
        assert_eq!(
            names,
            vec![
                Some("MEDELLÍN".into()),
                Some("ABEJORRAL".into()),
                Some("BOGOTÁ, D.C.".into())
            ]
        );
    }

    #[test]
    fn lowest_mortality_excludes_under_five_and_sorts_ascending() {
        let mut rows = Vec::new();
        for (munic, n) in [(1u32, 9usize), (2, 4), (3, 5), (4, 7)] {
            for _ in 0..n {
                rows.push(rec(5, munic, "I64"));
            }
        }
        for munic in 10..22u32 {
            for _ in 0..(5 + munic as usize) {
                rows.push(rec(11, munic, "I64"));
            }
        }
        let out = lowest_mortality_municipalities(&dataset(rows));
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|r| r.deaths >= LOW_MORTALITY_MIN_DEATHS));
        assert!(out.windows(2).all(|w| w[0].deaths <= w[1].deaths));
        assert_eq!(out[0].deaths, 5);
        assert_eq!(out[1], LowMortalityRow { municipality: None, deaths: 7 });
        assert_eq!(out[2].municipality.as_deref(), Some("MEDELLÍN"));
    }

    #[test]
    fn lowest_mortality_may_return_fewer_than_ten() {
        let rows = (0..6).map(|_| rec(5, 2, "I64")).collect();
        let out = lowest_mortality_municipalities(&dataset(rows));
        assert_eq!(
            out,
            vec![LowMortalityRow { municipality: Some("ABEJORRAL".into()), deaths: 6 }]
        );
    }

    #[test]
    fn top_causes_caps_at_ten() {
        let mut rows = Vec::new();
        for i in 0..12 {
            for _ in 0..=i {
                rows.push(rec(5, 1, &format!("C{i:02}")));
            }
        }
        rows.push(rec(5, 1, "J449"));
        let out = top_causes(&dataset(rows));
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].code, "C11");
        assert_eq!(out[0].total, 12);
        assert!(out.iter().all(|r| r.description == UNSPECIFIED_CAUSE));
        assert!(out.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn sex_breakdown_only_has_present_sexes() {
        let mut rows = Vec::new();
        for sex in [1, 1, 2] {
            let mut r = rec(5, 1, "I64");
            r.sex = Some(sex);
            rows.push(r);
        }
        let out = sex_by_department(&dataset(rows));
        assert_eq!(
            out,
            vec![
                SexDepartmentRow {
                    department: Some("ANTIOQUIA".into()),
                    sex: "Masculino".into(),
                    deaths: 2
                },
                SexDepartmentRow {
                    department: Some("ANTIOQUIA".into()),
                    sex: "Femenino".into(),
                    deaths: 1
                },
            ]
        );
    }

    #[test]
    fn sex_breakdown_pools_unknown_codes() {
        let mut rows = Vec::new();
        for sex in [None, Some(9), Some(3)] {
            let mut r = rec(11, 1, "I64");
            r.sex = sex;
            rows.push(r);
        }
        let out = sex_by_department(&dataset(rows));
        let labels: Vec<(&str, usize)> = out.iter().map(|r| (r.sex.as_str(), r.deaths)).collect();
        assert_eq!(labels, vec![("Indeterminado", 1), (UNKNOWN_LABEL, 2)]);
    }

    #[test]
    fn age_distribution_covers_every_record() {
        let rows: Vec<MortalityRecord> = (0..=29)
            .map(|code| {
                let mut r = rec(5, 1, "I64");
                r.age_group = Some(code);
                r
            })
            .collect();
        let data = dataset(rows);
        let out = age_group_distribution(&data).unwrap();
        assert_eq!(out.len(), 11);
        assert_eq!(out.iter().map(|r| r.deaths).sum::<usize>(), 30);
        assert_eq!(out[0], AgeGroupRow { group: "Mortalidad neonatal".into(), deaths: 5 });
        assert_eq!(out[1], AgeGroupRow { group: "Vejez".into(), deaths: 5 });
        assert_eq!(out[10], AgeGroupRow { group: "Edad desconocida".into(), deaths: 1 });
    }

    #[test]
    fn age_distribution_rejects_unknown_code() {
        let mut r = rec(5, 1, "I64");
        r.age_group = Some(30);
        let data = dataset(vec![rec(5, 1, "I64"), r]);
        assert_eq!(
            age_group_distribution(&data),
            Err(ReportError::UnknownAgeGroup { code: 30 })
        );
    }

    #[test]
    fn summary_counts() {
        let data = dataset(vec![rec(5, 1, "X951"), rec(5, 2, "I64"), rec(11, 1, "X950")]);
        let summary = generate_summary(&data);
        assert_eq!(summary.years, vec![2019]);
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_departments, 2);
        assert_eq!(summary.total_municipalities, 3);
        assert_eq!(summary.homicide_records, 2);
        assert_eq!(summary.cause_code_catalog_rows, 0);
    }

    #[test]
    fn empty_dataset_yields_empty_reports() {
        let data = dataset(Vec::new());
        assert!(department_totals(&data).is_empty());
        assert!(monthly_totals(&data).is_empty());
        assert!(top_violent_municipalities(&data).is_empty());
        assert!(lowest_mortality_municipalities(&data).is_empty());
        assert!(top_causes(&data).is_empty());
        assert!(sex_by_department(&data).is_empty());
        assert_eq!(age_group_distribution(&data), Ok(Vec::new()));
    }
}
