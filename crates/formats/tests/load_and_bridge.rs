use pretty_assertions::assert_eq;
use remap_formats::{detect_format, Format, ProguardLoader, TinyV1Loader, TinyV2Loader};
use remap_mappings::bridge;

const TINY_V1_SOURCE: &str = "\
v1\tofficial\tintermediary
CLASS\ta\tnet/mod/Engine
FIELD\ta\tI\tb\tfield_1
METHOD\ta\t(La;)V\tc\tmethod_1
";

const TINY_V2_SOURCE: &str = "\
tiny\t2\t0\tintermediary\tnamed
c\tnet/mod/Engine\tcom/example/Engine
\tf\tI\tfield_1\tspeed
\tm\t(Lnet/mod/Engine;)V\tmethod_1\tupdate
";

#[test]
fn bridging_two_loaded_formats_skips_the_intermediary() {
    let official_to_intermediary = TinyV1Loader::new("official", "intermediary")
        .parse_str(TINY_V1_SOURCE)
        .unwrap();
    let intermediary_to_named = TinyV2Loader::new("intermediary", "named")
        .parse_str(TINY_V2_SOURCE)
        .unwrap()
        .mappings;

    let direct = bridge(&official_to_intermediary, &intermediary_to_named);

    // consumers go straight from official to named, keyed by official
    assert_eq!(direct.map_class("a"), "com/example/Engine");
    assert_eq!(direct.map_field("a", "b", Some("I")), "speed");
    assert_eq!(direct.map_method("a", "c", "(La;)V"), "update");
}

#[test]
fn reversing_a_proguard_mapping_deobfuscates() {
    let source = "\
com.example.Engine -> a:
    int speed -> b
    void update(com.example.Engine) -> c
";
    let mut named_to_obf = ProguardLoader::new().parse_str(source).unwrap();
    let obf_to_named = named_to_obf.reverse();

    assert_eq!(obf_to_named.map_class("a"), "com/example/Engine");
    assert_eq!(obf_to_named.map_field("a", "b", Some("I")), "speed");
    assert_eq!(obf_to_named.map_method("a", "c", "(La;)V"), "update");
}

#[test]
fn detection_classifies_all_shipped_sources() {
    assert_eq!(detect_format(TINY_V1_SOURCE.lines()), Some(Format::TinyV1));
    assert_eq!(detect_format(TINY_V2_SOURCE.lines()), Some(Format::TinyV2));
    assert_eq!(
        detect_format("com.example.Engine -> a:".lines()),
        Some(Format::Proguard)
    );
    assert_eq!(
        detect_format("a/Engine x/Engine".lines()),
        Some(Format::TsrgV1)
    );
}

#[test]
fn tiny_v2_metadata_serializes() {
    let source = "\
tiny\t2\t0\tofficial\tnamed
c\ta\tcom/example/Engine
\tc\tThe main engine class.
";
    let doc = TinyV2Loader::new("official", "named")
        .with_metadata(true)
        .parse_str(source)
        .unwrap();
    let metadata = doc.metadata.unwrap();

    let json = serde_json::to_string(&metadata).unwrap();
    let back: remap_formats::TinyV2Metadata = serde_json::from_str(&json).unwrap();
    assert_eq!(metadata, back);
}
