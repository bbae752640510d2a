//! Placeholder token vocabulary and display formatting.
//!
//! The token set is fixed; Excel/Word templates get literal replacement of
//! these tokens only, and the HTML scope reuses the same formatting so every
//! format renders a field identically.
//!
//! Formatting rules:
//! - dates as `YYYY年MM月DD日`, empty string when absent
//! - yen amounts with thousands separators and a trailing 円; absent
//!   optional amounts render a literal `-`, never an empty string
//! - floor area as the numeric value followed by ㎡
//! - absent phone/email render as empty strings

use chrono::NaiveDate;

use super::resolver::ContractBundle;

/// Format a date in the Japanese contract style, e.g. `2024年04月01日`.
pub fn format_japanese_date(date: NaiveDate) -> String {
    date.format("%Y年%m月%d日").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_japanese_date).unwrap_or_default()
}

/// Format a yen amount with thousands separators, e.g. `150,000円`.
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('円');
    out
}

/// Optional monetary fields render a literal dash when absent.
pub fn format_optional_yen(amount: Option<i64>) -> String {
    amount.map(format_yen).unwrap_or_else(|| "-".to_string())
}

pub fn format_floor_area(area: f64) -> String {
    format!("{area}㎡")
}

fn optional_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Build the token -> display-string table for one resolved contract.
/// Returned in a stable order; renderers only ever iterate it.
pub fn placeholder_table(bundle: &ContractBundle) -> Vec<(String, String)> {
    let contract = &bundle.contract;
    let owner = &bundle.owner;
    let building = &bundle.building;
    let room = &bundle.room;
    let agent = &bundle.agent;

    let entries: [(&str, String); 26] = [
        ("contract.contract_number", contract.contract_number.clone()),
        ("contract.tenant_name", contract.tenant_name.clone()),
        ("contract.tenant_address", contract.tenant_address.clone()),
        ("contract.tenant_phone", optional_text(&contract.tenant_phone)),
        ("contract.tenant_email", optional_text(&contract.tenant_email)),
        ("contract.start_date", format_japanese_date(contract.start_date)),
        ("contract.end_date", format_optional_date(contract.end_date)),
        ("contract.rent_amount", format_yen(contract.rent_amount)),
        (
            "contract.security_deposit",
            format_optional_yen(contract.security_deposit),
        ),
        ("contract.key_money", format_optional_yen(contract.key_money)),
        (
            "contract.management_fee",
            format_optional_yen(contract.management_fee),
        ),
        ("owner.name", owner.name.clone()),
        ("owner.address", owner.address.clone()),
        ("owner.phone", optional_text(&owner.phone)),
        ("owner.email", optional_text(&owner.email)),
        ("building.name", building.name.clone()),
        ("building.address", building.address.clone()),
        ("building.structure", building.structure.clone()),
        ("building.type", building.building_type.clone()),
        ("building.floors", building.floors.to_string()),
        ("room.room_number", room.room_number.clone()),
        ("room.layout", room.layout.clone()),
        ("room.floor", room.floor.to_string()),
        ("room.floor_area", format_floor_area(room.floor_area)),
        ("agent.name", agent.name.clone()),
        ("agent.license_number", agent.license_number.clone()),
    ];

    entries
        .into_iter()
        .map(|(token, value)| (format!("{{{{{token}}}}}"), value))
        .collect()
}

/// Replace every known token occurring in `text`. Tokens outside the table
/// are left verbatim.
pub fn apply_tokens(text: &str, table: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (token, value) in table {
        if out.contains(token.as_str()) {
            out = out.replace(token.as_str(), value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fixtures::sample_bundle;

    #[test]
    fn test_format_yen_thousands_separator() {
        assert_eq!(format_yen(150_000), "150,000円");
        assert_eq!(format_yen(1_234_567), "1,234,567円");
        assert_eq!(format_yen(500), "500円");
        assert_eq!(format_yen(0), "0円");
    }

    #[test]
    fn test_absent_money_renders_dash() {
        assert_eq!(format_optional_yen(None), "-");
        assert_eq!(format_optional_yen(Some(0)), "0円");
    }

    #[test]
    fn test_date_formatting() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(format_japanese_date(date), "2024年04月01日");
        assert_eq!(format_optional_date(None), "");
    }

    #[test]
    fn test_floor_area() {
        assert_eq!(format_floor_area(25.5), "25.5㎡");
    }

    #[test]
    fn test_table_covers_full_vocabulary() {
        let table = placeholder_table(&sample_bundle());
        assert_eq!(table.len(), 26);
        let lookup = |token: &str| {
            table
                .iter()
                .find(|(t, _)| t == token)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(lookup("{{contract.rent_amount}}"), "150,000円");
        assert_eq!(lookup("{{contract.security_deposit}}"), "-");
        assert_eq!(lookup("{{contract.start_date}}"), "2024年04月01日");
        assert_eq!(lookup("{{contract.end_date}}"), "");
        assert_eq!(lookup("{{contract.tenant_phone}}"), "");
        assert_eq!(lookup("{{room.floor_area}}"), "25.5㎡");
        assert_eq!(lookup("{{building.type}}"), "マンション");
    }

    #[test]
    fn test_apply_tokens_replaces_inline() {
        let table = placeholder_table(&sample_bundle());
        assert_eq!(apply_tokens("{{owner.name}}様", &table), "山田太郎様");
        assert_eq!(
            apply_tokens("賃料 {{contract.rent_amount}} / 敷金 {{contract.security_deposit}}", &table),
            "賃料 150,000円 / 敷金 -"
        );
    }

    #[test]
    fn test_apply_tokens_leaves_unknown_tokens() {
        let table = placeholder_table(&sample_bundle());
        assert_eq!(
            apply_tokens("{{contract.unknown_field}}", &table),
            "{{contract.unknown_field}}"
        );
    }
}
