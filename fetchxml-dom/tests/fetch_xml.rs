//! Rendering of complete queries.

mod common;

use chrono::NaiveDate;
use fetchxml_dom::prelude::*;
use uuid::Uuid;

fn xml(lines: &[&str]) -> String {
    lines.join("\n")
}

#[test]
fn test_table_only() {
    common::init_logger();
    let fetch = FetchExpression::new("account").unwrap();
    assert_eq!(
        fetch.to_xml(),
        xml(&["<fetch>", "  <entity name=\"account\" />", "</fetch>"])
    );
}

#[test]
fn test_top() {
    let mut fetch = FetchExpression::new("account").unwrap();
    fetch.set_top(Some(10));
    assert_eq!(
        fetch.to_xml(),
        xml(&["<fetch top=\"10\">", "  <entity name=\"account\" />", "</fetch>"])
    );
}

#[test]
fn test_without_table() {
    let mut fetch = FetchExpression::default();
    assert_eq!(fetch.to_xml(), "<fetch />");
    fetch.set_top(Some(10));
    assert_eq!(fetch.to_xml(), "<fetch top=\"10\" />");
}

#[test]
fn test_join_with_value_of() {
    common::init_logger();
    let mut fetch = FetchExpression::new("contact").unwrap();
    fetch.add_columns(["contactid", "fullname"]).unwrap();
    fetch
        .add_filter(FilterType::And)
        .add_condition_to_other_column("fullname", ConditionOperator::Equal, "acct.name")
        .unwrap();
    fetch
        .add_link("account", "accountid", "parentcustomerid", LinkType::Outer, Some("acct"))
        .unwrap()
        .add_columns(["name"])
        .unwrap();

    let expected = xml(&[
        "<fetch>",
        "  <entity name=\"contact\">",
        "    <attribute name=\"contactid\" />",
        "    <attribute name=\"fullname\" />",
        "    <filter type=\"and\">",
        "      <condition attribute=\"fullname\" operator=\"eq\" valueof=\"acct.name\" />",
        "    </filter>",
        "    <link-entity name=\"account\" from=\"accountid\" to=\"parentcustomerid\" link-type=\"outer\" alias=\"acct\">",
        "      <attribute name=\"name\" />",
        "    </link-entity>",
        "  </entity>",
        "</fetch>",
    ]);
    assert_eq!(fetch.render(true).unwrap(), expected);
}

#[test]
fn test_aggregate() {
    let mut fetch = FetchExpression::new("contact").unwrap();
    fetch.set_aggregate(Some(true));
    fetch
        .add_group_column("lastname", None, None)
        .unwrap()
        .add_aggregate_column("contactid", AggregateFunction::Count, Some("Count"))
        .unwrap();

    let expected = xml(&[
        "<fetch aggregate=\"true\">",
        "  <entity name=\"contact\">",
        "    <attribute name=\"lastname\" alias=\"lastname\" groupby=\"true\" />",
        "    <attribute name=\"contactid\" alias=\"Count\" aggregate=\"count\" />",
        "  </entity>",
        "</fetch>",
    ]);
    assert_eq!(fetch.render(true).unwrap(), expected);
}

#[test]
fn test_compact_layout() {
    let mut fetch = FetchExpression::new("contact").unwrap();
    fetch.add_columns(["fullname"]).unwrap();
    fetch
        .add_condition_values("statuscode", ConditionOperator::In, [1, 2])
        .unwrap();

    assert_eq!(
        fetch.to_xml_with(&XmlOptions::compact()),
        "<fetch><entity name=\"contact\"><attribute name=\"fullname\" /><filter type=\"and\"><condition attribute=\"statuscode\" operator=\"in\"><value>1</value><value>2</value></condition></filter></entity></fetch>"
    );
}

#[test]
fn test_custom_indent() {
    let fetch = FetchExpression::new("account").unwrap();
    let options = XmlOptions::default().with_indent("\t").with_new_line("\r\n");
    assert_eq!(
        fetch.to_xml_with(&options),
        "<fetch>\r\n\t<entity name=\"account\" />\r\n</fetch>"
    );
}

#[test]
fn test_escaped_value() {
    let mut fetch = FetchExpression::new("contact").unwrap();
    fetch
        .add_condition_value("fullname", ConditionOperator::Equal, "John \"Doe\" Tribbiani")
        .unwrap();

    assert!(fetch
        .to_xml()
        .contains(r#"<condition attribute="fullname" operator="eq" value="John &quot;Doe&quot; Tribbiani" />"#));
}

#[test]
fn test_typed_values() {
    let id = Uuid::parse_str("7b5d4e1f-0000-0000-0000-00000000abcd").unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

    let mut fetch = FetchExpression::new("account").unwrap();
    fetch
        .add_condition_value("accountid", ConditionOperator::Equal, id)
        .unwrap()
        .add_condition_value("createdon", ConditionOperator::OnOrAfter, day)
        .unwrap()
        .add_condition_value("donotemail", ConditionOperator::Equal, false)
        .unwrap();

    let xml = fetch.to_xml();
    assert!(xml.contains(r#"value="7b5d4e1f-0000-0000-0000-00000000abcd""#));
    assert!(xml.contains(r#"value="2024-02-29""#));
    assert!(xml.contains(r#"attribute="donotemail" operator="eq" value="0""#));
}

#[test]
fn test_existence_filter() {
    let mut fetch = FetchExpression::new("account").unwrap();
    fetch.add_columns(["name"]).unwrap();
    fetch
        .add_filter(FilterType::And)
        .add_link("task", "regardingobjectid", "accountid", LinkType::NotAny, None)
        .unwrap()
        .add_condition("statecode", ConditionOperator::NotNull)
        .unwrap();

    let expected = xml(&[
        "<fetch>",
        "  <entity name=\"account\">",
        "    <attribute name=\"name\" />",
        "    <filter type=\"and\">",
        "      <link-entity name=\"task\" from=\"regardingobjectid\" to=\"accountid\" link-type=\"not any\">",
        "        <filter type=\"and\">",
        "          <condition attribute=\"statecode\" operator=\"not-null\" />",
        "        </filter>",
        "      </link-entity>",
        "    </filter>",
        "  </entity>",
        "</fetch>",
    ]);
    assert_eq!(fetch.to_xml(), expected);
}

#[test]
fn test_nested_filters_and_orders() {
    let mut fetch = FetchExpression::new("account").unwrap();
    fetch.all_columns();
    let filter = fetch.add_filter(FilterType::And);
    filter
        .add_condition_value("statecode", ConditionOperator::Equal, 0)
        .unwrap();
    filter
        .add_filter(FilterType::Or)
        .set_union_hint(true)
        .add_condition_value("name", ConditionOperator::Like, "A%")
        .unwrap()
        .add_condition_values("revenue", ConditionOperator::Between, [10, 20])
        .unwrap();
    fetch
        .order_by_descending("revenue")
        .unwrap()
        .order_by("name")
        .unwrap();

    let expected = xml(&[
        "<fetch>",
        "  <entity name=\"account\">",
        "    <all-attributes />",
        "    <filter type=\"and\">",
        "      <condition attribute=\"statecode\" operator=\"eq\" value=\"0\" />",
        "      <filter type=\"or\" hint=\"union\">",
        "        <condition attribute=\"name\" operator=\"like\" value=\"A%\" />",
        "        <condition attribute=\"revenue\" operator=\"between\">",
        "          <value>10</value>",
        "          <value>20</value>",
        "        </condition>",
        "      </filter>",
        "    </filter>",
        "    <order attribute=\"revenue\" descending=\"true\" />",
        "    <order attribute=\"name\" />",
        "  </entity>",
        "</fetch>",
    ]);
    assert_eq!(fetch.render(true).unwrap(), expected);
}

#[test]
fn test_generated_link_aliases() {
    let mut fetch = FetchExpression::new("account").unwrap();
    fetch
        .add_link("contact", "contactid", "primarycontactid", LinkType::Inner, None)
        .unwrap()
        .add_link("systemuser", "systemuserid", "owninguser", LinkType::Outer, None)
        .unwrap();
    fetch
        .add_link("contact", "parentcustomerid", "accountid", LinkType::Inner, None)
        .unwrap();

    let options = XmlOptions::default().with_generated_link_aliases(true);
    let xml = fetch.to_xml_with(&options);
    let aliases: Vec<_> = xml
        .lines()
        .filter_map(|line| line.split("alias=\"").nth(1))
        .filter_map(|rest| rest.split('"').next())
        .collect();
    assert_eq!(aliases, ["contact1", "systemuser2", "contact3"]);
    assert!(!fetch.to_xml().contains("alias="));
}

#[test]
fn test_rendering_is_deterministic() {
    let build = || {
        let mut fetch = FetchExpression::new("account").unwrap();
        fetch
            .add_option(FetchOption::ForceOrder)
            .add_option(FetchOption::DisableRowGoal);
        fetch.add_columns(["name"]).unwrap();
        fetch.order_by("name").unwrap();
        fetch
    };
    assert_eq!(build().to_xml(), build().to_xml());
    assert!(build()
        .to_xml()
        .starts_with("<fetch options=\"ForceOrder,DisableRowGoal\">"));
}
