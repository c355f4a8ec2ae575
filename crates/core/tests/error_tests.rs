// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use fund_reinvest_core::errors::CoreError;
use fund_reinvest_core::models::instrument::InstrumentId;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn missing_price_data() {
        let err = CoreError::MissingPriceData {
            instrument: InstrumentId::new("vtsax"),
            date: d(2024, 3, 15),
        };
        assert_eq!(err.to_string(), "Missing NAV for VTSAX on 2024-03-15");
    }

    #[test]
    fn invalid_distribution_ratio() {
        let err = CoreError::InvalidDistributionRatio {
            instrument: InstrumentId::new("VMFXX"),
            date: d(2024, 1, 31),
        };
        assert_eq!(
            err.to_string(),
            "Invalid distribution ratio for VMFXX on 2024-01-31: reinvestment price is zero or missing"
        );
    }

    #[test]
    fn empty_window() {
        let err = CoreError::EmptyWindow {
            instrument: InstrumentId::new("VBTLX"),
            start_date: d(2025, 1, 1),
        };
        assert_eq!(err.to_string(), "No data for VBTLX on or after 2025-01-01");
    }

    #[test]
    fn arithmetic_overflow() {
        let err = CoreError::ArithmeticOverflow {
            subject: "VTSAX".into(),
            date: d(2024, 2, 1),
        };
        assert_eq!(err.to_string(), "Arithmetic overflow for VTSAX on 2024-02-01");
    }

    #[test]
    fn insufficient_alignment() {
        let err = CoreError::InsufficientAlignment {
            portfolio_a: "Cash".into(),
            portfolio_b: "Growth".into(),
        };
        assert_eq!(
            err.to_string(),
            "Portfolios 'Cash' and 'Growth' share no common date"
        );
    }

    #[test]
    fn zero_base_value() {
        let err = CoreError::ZeroBaseValue {
            portfolio: "Cash".into(),
            date: d(2024, 1, 1),
        };
        assert_eq!(
            err.to_string(),
            "Portfolio 'Cash' has a zero total on 2024-01-01; cannot index against it"
        );
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("bad input".into());
        assert_eq!(err.to_string(), "Validation failed: bad input");
    }

    #[test]
    fn unknown_instrument() {
        let err = CoreError::UnknownInstrument("XYZ".into());
        assert_eq!(err.to_string(), "No data supplied for instrument: XYZ");
    }

    #[test]
    fn configuration() {
        let err = CoreError::Configuration("missing field".into());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn source() {
        let err = CoreError::Source {
            source_name: "snapshot".into(),
            message: "no data for X".into(),
        };
        assert_eq!(err.to_string(), "Source error (snapshot): no data for X");
    }

    #[test]
    fn no_source() {
        let err = CoreError::NoSource("VTSAX".into());
        assert_eq!(err.to_string(), "No source available for instrument: VTSAX");
    }
}

// ── Classification ──────────────────────────────────────────────────

mod classification {
    use super::*;

    #[test]
    fn per_instrument_errors_are_data_errors() {
        let id = InstrumentId::new("X");
        assert!(CoreError::MissingPriceData { instrument: id.clone(), date: d(2024, 1, 1) }.is_data_error());
        assert!(CoreError::InvalidDistributionRatio { instrument: id.clone(), date: d(2024, 1, 1) }.is_data_error());
        assert!(CoreError::EmptyWindow { instrument: id, start_date: d(2024, 1, 1) }.is_data_error());
        assert!(CoreError::ArithmeticOverflow { subject: "X".into(), date: d(2024, 1, 1) }.is_data_error());
        assert!(CoreError::UnknownInstrument("X".into()).is_data_error());
        assert!(CoreError::NoSource("X".into()).is_data_error());
    }

    #[test]
    fn portfolio_level_errors_are_not_data_errors() {
        assert!(!CoreError::InsufficientAlignment {
            portfolio_a: "A".into(),
            portfolio_b: "B".into(),
        }
        .is_data_error());
        assert!(!CoreError::ZeroBaseValue {
            portfolio: "A".into(),
            date: d(2024, 1, 1),
        }
        .is_data_error());
        assert!(!CoreError::Configuration("x".into()).is_data_error());
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn errors_are_debug_printable() {
        let err = CoreError::NoSource("X".into());
        assert!(format!("{err:?}").contains("NoSource"));
    }
}
