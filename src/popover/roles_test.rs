use super::*;

#[test]
fn test_builtin_roles() {
    let roles = AssistantRoles::builtin();
    assert_eq!(roles.resolve("alerts"), Some(ALERT_ANALYSIS_ROLE));
    assert_eq!(roles.resolve("visualizations"), None);
    assert_eq!(roles.resolve(""), None);
}

#[test]
fn test_roles_from_config() {
    let config = InsightConfig {
        fallback_question: "unused".to_string(),
        roles: HashMap::from([
            ("logs".to_string(), "You analyse logs.".to_string()),
            ("alerts".to_string(), "Custom alert role.".to_string()),
        ]),
    };

    let roles = AssistantRoles::from_config(&config);
    assert_eq!(roles.resolve("logs"), Some("You analyse logs."));
    assert_eq!(roles.resolve("alerts"), Some("Custom alert role."));
    assert_eq!(AssistantRoles::empty().resolve("alerts"), None);
}
