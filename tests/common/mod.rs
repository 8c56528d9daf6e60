use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Build one slot tooltip fragment the way the booking site renders it
#[allow(dead_code)]
pub fn slot_fragment(date_display: &str, session: &str, slot_id: &str, cell: &str) -> String {
    format!(
        "doTooltipV(event,0, \"{date_display}\",\"{session}\",\"11:30\",\"13:10\",\"BBDC\"); \
         SetMouseOverToggleColor(\"{cell}\") ' onmouseout='hideTip(); \
         SetMouseOverToggleColor(\"{cell}\")'><input type=\"checkbox\" id=\"{cell}\" \
         name=\"slot\" value=\"{slot_id}\" onclick=\"SetCountAndToggleColor('{cell}');\">"
    )
}

/// Wrap slot fragments in the listing page's surrounding boilerplate
#[allow(dead_code)]
pub fn listing_page(fragments: &[String]) -> String {
    let mut page = String::from(
        "<html><body><form name=\"myform\"><table class=\"booking\"><tr><td onmouseover='",
    );
    page.push_str(&fragments.join("</td><td onmouseover='"));
    page.push_str("</td></tr></table></form></body></html>");
    page
}
