//! Translation between the console's display categories and the admin API category codes.

/// Code used for anything outside the table.
pub const FALLBACK_CODE: &str = "other";
/// Display label used for anything outside the table.
pub const FALLBACK_LABEL: &str = "其他";

const CATEGORY_TABLE: [(&str, &str); 10] = [
    ("文字處理", "productivity"),
    ("圖像生成", "ai_model"),
    ("數據分析", "data_analysis"),
    ("教育工具", "educational"),
    ("健康醫療", "healthcare"),
    ("金融科技", "finance"),
    ("溝通協作", "communication"),
    ("娛樂休閒", "entertainment"),
    ("自動化", "automation"),
    (FALLBACK_LABEL, FALLBACK_CODE),
];

pub fn to_api_code(label: &str) -> &'static str {
    let label = label.trim();
    CATEGORY_TABLE
        .iter()
        .find(|(display, _)| *display == label)
        .map(|(_, code)| *code)
        .unwrap_or(FALLBACK_CODE)
}

pub fn to_display_label(code: &str) -> &'static str {
    let code = code.trim();
    CATEGORY_TABLE
        .iter()
        .find(|(_, api)| api.eq_ignore_ascii_case(code))
        .map(|(display, _)| *display)
        .unwrap_or(FALLBACK_LABEL)
}

/// Display labels in table order, for pickers.
pub fn display_labels() -> impl Iterator<Item = &'static str> {
    CATEGORY_TABLE.iter().map(|(display, _)| *display)
}
