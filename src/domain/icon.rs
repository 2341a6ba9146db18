/// Ordered keyword table; the first row with a matching keyword wins.
const ICON_RULES: &[(&[&str], &str)] = &[
    (&["finish", "complete", "done"], "🏁"),
    (&["fix", "bug"], "🐛"),
    (&["keep", "merge"], "✅"),
    (&["experiment", "try"], "🧪"),
    (&["doc", "readme", "note"], "📝"),
    (&["remove", "delete", "clean"], "🧹"),
    (&["start", "init", "begin"], "🌱"),
];

const DEFAULT_ICON: &str = "📸";

pub fn icon_for(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
