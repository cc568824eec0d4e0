use citygml_prep::citygml::Document;
use citygml_prep::export::export_report;
use citygml_prep::inject::{inject_attributes, process};
use citygml_prep::model::{AttributeKind, BuildingTable, CellValue, FileOutcome};
use citygml_prep::spreadsheet::load_table;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

const DISTRICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<core:CityModel xmlns:core="http://www.opengis.net/citygml/2.0" xmlns:bldg="http://www.opengis.net/citygml/building/2.0" xmlns:gen="http://www.opengis.net/citygml/generics/2.0" xmlns:gml="http://www.opengis.net/gml">
  <core:cityObjectMember>
    <bldg:Building gml:id="DEBW_001">
      <bldg:function>31001_1010</bldg:function>
    </bldg:Building>
  </core:cityObjectMember>
  <core:cityObjectMember>
    <bldg:Building gml:id="DEBW_002">
      <bldg:yearOfConstruction>1890</bldg:yearOfConstruction>
    </bldg:Building>
  </core:cityObjectMember>
</core:CityModel>
"#;

const TABLE: &str = "BuildingID,yearOfConstruction,comment
attribute_type,bldg,gen
DEBW_001,1950,corner house
DEBW_002,1900,
";

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn texts<'a>(document: &'a Document, local_name: &str) -> Vec<&'a str> {
    document
        .root
        .descendants()
        .filter(|e| e.local_name() == local_name)
        .filter_map(|e| e.text.as_deref())
        .collect()
}

#[test]
fn batch_continues_after_invalid_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::create_dir(&input).unwrap();

    write(&input, "a.gml", DISTRICT);
    write(&input, "a.csv", TABLE);
    write(&input, "b.gml", DISTRICT);
    write(&input, "b.csv", "BuildingID,yearOfConstruction\nattribute_type,bldg\n7,1\n7.0,2\n");
    write(&input, "c.gml", DISTRICT);

    let report = inject_attributes(&input, &output).unwrap();

    let statuses: Vec<&str> = report
        .files
        .iter()
        .map(|f| match f.outcome {
            FileOutcome::Injected { .. } => "injected",
            FileOutcome::TemplateWritten { .. } => "template",
            FileOutcome::Failed { .. } => "failed",
        })
        .collect();
    assert_eq!(statuses, vec!["injected", "failed", "template"]);
    assert_eq!(report.failed_count(), 1);

    assert!(output.join("a.gml").is_file());
    assert!(!output.join("b.gml").exists());
    assert!(!output.join("c.gml").exists());
    assert!(input.join("c.csv").is_file());

    match &report.files[1].outcome {
        FileOutcome::Failed { reason } => assert!(reason.contains('7'), "{reason}"),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let injected = Document::open(output.join("a.gml")).unwrap();
    assert_eq!(texts(&injected, "yearOfConstruction"), vec!["1950", "1890"]);
    assert_eq!(texts(&injected, "value"), vec!["corner house"]);
}

#[test]
fn injected_output_is_indented() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::create_dir(&input).unwrap();
    write(&input, "a.gml", DISTRICT);
    write(&input, "a.csv", TABLE);

    inject_attributes(&input, &output).unwrap();

    let written = fs::read_to_string(output.join("a.gml")).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<core:CityModel"));
    assert!(written.contains(
        "    <bldg:Building gml:id=\"DEBW_001\">\n      \
         <gen:stringAttribute name=\"comment\">\n        \
         <gen:value>corner house</gen:value>\n      \
         </gen:stringAttribute>\n      \
         <bldg:function>31001_1010</bldg:function>\n      \
         <bldg:yearOfConstruction>1950</bldg:yearOfConstruction>\n    \
         </bldg:Building>"
    ));
    assert!(written.ends_with("</core:CityModel>\n"));
}

#[test]
fn rerunning_on_output_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir(&input).unwrap();
    write(&input, "a.gml", DISTRICT);
    write(&input, "a.csv", TABLE);

    inject_attributes(&input, &first).unwrap();
    fs::copy(input.join("a.csv"), first.join("a.csv")).unwrap();
    let report = inject_attributes(&first, &second).unwrap();

    assert_eq!(added(&report.files[0].outcome), 0);
    assert_eq!(
        fs::read_to_string(second.join("a.gml")).unwrap(),
        fs::read_to_string(first.join("a.gml")).unwrap()
    );
}

fn added(outcome: &FileOutcome) -> usize {
    match outcome {
        FileOutcome::Injected { added, .. } => *added,
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn empty_generic_value_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir(&first).unwrap();
    fs::create_dir(&second).unwrap();
    let source = dir.path().join("a.gml");
    fs::write(&source, DISTRICT).unwrap();

    let table = BuildingTable::new(
        vec!["comment".into()],
        [("comment".to_string(), AttributeKind::Generic)].into_iter().collect(),
    )
    .with_record("DEBW_001", [("comment", CellValue::Text(String::new()))]);

    let outcome = process(&table, &source, &first).unwrap();
    assert_eq!(added(&outcome), 1);
    let once = fs::read_to_string(first.join("a.gml")).unwrap();
    assert!(once.contains("<gen:stringAttribute name=\"comment\">\n        <gen:value/>"));

    let outcome = process(&table, &first.join("a.gml"), &second).unwrap();
    assert_eq!(added(&outcome), 0);
    assert_eq!(fs::read_to_string(second.join("a.gml")).unwrap(), once);
}

#[test]
fn workbook_with_empty_cell_reruns_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir(&input).unwrap();
    write(&input, "a.gml", DISTRICT);
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/district.xlsx");
    fs::copy(&fixture, input.join("a.xlsx")).unwrap();

    let report = inject_attributes(&input, &first).unwrap();
    assert_eq!(added(&report.files[0].outcome), 3);

    let injected = Document::open(first.join("a.gml")).unwrap();
    assert_eq!(texts(&injected, "yearOfConstruction"), vec!["1950", "1890"]);
    assert_eq!(texts(&injected, "value"), vec!["corner house"]);
    let values = injected
        .root
        .descendants()
        .filter(|e| e.local_name() == "value")
        .count();
    assert_eq!(values, 2);

    fs::copy(&fixture, first.join("a.xlsx")).unwrap();
    let report = inject_attributes(&first, &second).unwrap();
    assert_eq!(added(&report.files[0].outcome), 0);
    assert_eq!(
        fs::read_to_string(second.join("a.gml")).unwrap(),
        fs::read_to_string(first.join("a.gml")).unwrap()
    );
}

#[test]
fn template_lists_buildings_and_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    write(&input, "district.gml", DISTRICT);

    inject_attributes(&input, &dir.path().join("output")).unwrap();

    let template = fs::read_to_string(input.join("district.csv")).unwrap();
    let lines: Vec<&str> = template.lines().collect();
    assert_eq!(
        lines,
        vec![
            "BuildingID;yearOfConstruction;function;comment",
            "attribute_type;bldg;bldg;gen",
            "building123456789;1234;1010;Fake building",
            "DEBW_001;;31001_1010;",
            "DEBW_002;1890;;",
        ]
    );

    let table = load_table(input.join("district.csv")).unwrap().unwrap();
    assert_eq!(table.len(), 3);
    assert!(table.get("DEBW_002").is_some());
}

#[test]
fn report_is_exported_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    write(&input, "a.gml", DISTRICT);

    let report = inject_attributes(&input, &dir.path().join("output")).unwrap();
    let report_path = dir.path().join("report.json");
    export_report(&report, &report_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["files"][0]["outcome"]["status"], "template_written");
}
