//! Snapshot tests
//!
//! Parses whole documents through the public entry points and compares a
//! rendered view of the resulting tree.

use pbag::bag::PropertyBag;

fn render(bag: PropertyBag<'_>) -> String {
    let mut out = String::new();
    render_children(bag, 0, &mut out);
    out
}

// own children only; inherited names stay behind their bases
fn render_children(bag: PropertyBag<'_>, depth: usize, out: &mut String) {
    for child in bag.children() {
        out.push_str(&"  ".repeat(depth));
        match child.value() {
            Some(value) => out.push_str(&format!("{} = {}\n", child.name(), value)),
            None => {
                out.push_str(child.name());
                out.push('\n');
                render_children(child, depth + 1, out);
            }
        }
    }
}

#[test]
fn weapons_document() {
    init_tracing();

    let tree = pbag::document::parse_str(
        "\
::weapon
    damage = 5
    speed = 10

sword :: weapon
    speed = 7
    description =
        A simple blade,
        reliable and cheap.

loot
    :: weapon
    = gold
",
    )
    .unwrap();

    insta::assert_snapshot!(render(tree.root()), @r"
sword
  speed = 7
  description = A simple blade, reliable and cheap.
loot
  0
  1 = gold
");

    // inherited values resolve even though they are not rendered
    let sword = tree.root().get("sword").unwrap();
    assert_eq!(sword.get("damage").unwrap().value(), Some("5"));
}

#[test]
fn includes_and_scoping() {
    init_tracing();

    let mut fs = pbag::source::MemoryFs::new();
    fs.insert(
        "data/mobs/vermin.pb",
        "::vermin\n    hp = 1\nrat :: vermin\nbat :: vermin\n    hp = 2\n",
    );
    fs.insert(
        "data/main.pb",
        "#include \"mobs/vermin.pb\"\ncave_rat :: vermin\n    hp = 3\n",
    );

    let tree = pbag::document::parse_file(&fs, std::path::Path::new("data/main.pb")).unwrap();

    insta::assert_snapshot!(render(tree.root()), @r"
rat
bat
  hp = 2
cave_rat
  hp = 3
");

    // the template spliced in from the include backs lookups on every entry
    let rat = tree.root().get("rat").unwrap();
    assert_eq!(rat.get("hp").unwrap().value(), Some("1"));
}

#[test]
fn json_view_of_a_document() {
    init_tracing();

    let tree = pbag::document::parse_str(
        "sword\n    speed = 7\nloot\n    = gold\n    trinket\n",
    )
    .unwrap();

    let json = serde_json::to_string(&tree.root()).unwrap();
    assert_eq!(
        json,
        r#"{"sword":{"speed":"7"},"loot":{"0":"gold","trinket":{}}}"#
    );
}

fn init_tracing() {
    // several tests race to install the global subscriber; losing is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PBAG_LOG"))
        .with_writer(std::io::stderr)
        .try_init();
}
