// src/common/dates.rs

use chrono::NaiveDate;
use std::cmp::Ordering;

// Todas as regras de tarifa trabalham em dia de calendário ("YYYY-MM-DD"),
// nunca em timestamp. `NaiveDate` não carrega fuso, então a normalização
// para meia-noite local que o portal fazia deixa de existir aqui.

pub fn parse_date_only(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

// Comparador de três vias com sentinela: um operando ausente conta como
// "maior" (+∞), para nunca casar igualdade com um campo vazio. Política
// deliberada, não um erro.
pub fn cmp_opt(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

// Intervalo inclusivo nas duas pontas (contrato do palier de preço).
pub fn contains_day(start: NaiveDate, end: NaiveDate, day: NaiveDate) -> bool {
    start <= day && day <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date_only(s).unwrap()
    }

    #[test]
    fn parse_aceita_formato_calendario() {
        assert_eq!(
            parse_date_only("2025-12-31"),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(parse_date_only(" 2025-01-01 "), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(parse_date_only("31/12/2025"), None);
        assert_eq!(parse_date_only(""), None);
    }

    #[test]
    fn comparador_trata_ausente_como_maior() {
        assert_eq!(cmp_opt(None, Some(d("2025-01-01"))), Ordering::Greater);
        assert_eq!(cmp_opt(Some(d("2025-01-01")), None), Ordering::Less);
        assert_eq!(cmp_opt(None, None), Ordering::Equal);
        assert_eq!(
            cmp_opt(Some(d("2025-01-01")), Some(d("2025-01-01"))),
            Ordering::Equal
        );
        assert_eq!(
            cmp_opt(Some(d("2025-01-02")), Some(d("2025-01-01"))),
            Ordering::Greater
        );
    }

    #[test]
    fn intervalo_inclusivo_nas_duas_pontas() {
        let s = d("2025-01-01");
        let e = d("2025-06-30");
        assert!(contains_day(s, e, s));
        assert!(contains_day(s, e, e));
        assert!(contains_day(s, e, d("2025-03-15")));
        assert!(!contains_day(s, e, d("2025-07-01")));
        assert!(!contains_day(s, e, d("2024-12-31")));
    }
}
