use std::fs;
use textflow::{create_writer, read_all, write_all, CharsetCoding, LineSeparator, Record};

fn from_texts(texts: Vec<Option<&str>>) -> Record {
    Record::from_texts(
        None,
        None,
        texts.into_iter().map(|t| t.map(str::to_owned)),
    )
}

#[cfg(feature = "format-delimited")]
mod delimited {
    use super::*;
    use textflow::SimpleDelimitedFileSpec;

    fn spec(skip_empty: bool, skip_all_null: bool) -> SimpleDelimitedFileSpec {
        SimpleDelimitedFileSpec::new(";", 3, LineSeparator::Lf, 0, 0, skip_empty, skip_all_null)
            .unwrap()
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(SimpleDelimitedFileSpec::new("", 3, LineSeparator::Lf, 0, 0, false, false).is_err());
        assert!(SimpleDelimitedFileSpec::new(";", 0, LineSeparator::Lf, 0, 0, false, false).is_err());
    }

    #[test]
    fn splits_without_quoting() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "a;b;c\n;;\nx;;z\nshort\n")?;

        let mut producer = spec(false, false).producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        assert_eq!(records[0].texts(), vec![Some("a"), Some("b"), Some("c")]);
        // Nothing between delimiters reads as null.
        assert_eq!(records[1].texts(), vec![None, None, None]);
        assert_eq!(records[2].texts(), vec![Some("x"), None, Some("z")]);
        // Positions past the end of the line read as null.
        assert_eq!(records[3].texts(), vec![Some("short"), None, None]);
        Ok(())
    }

    #[test]
    fn skip_options() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "a;b;c\n\n;;\nd;e;f\n")?;

        let mut producer = spec(true, true).producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].texts(), vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(records[1].texts(), vec![Some("d"), Some("e"), Some("f")]);
        Ok(())
    }

    #[test]
    fn writes_null_as_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        let mut consumer = spec(false, false).consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![from_texts(vec![Some("a"), None, Some("c")])],
        )?;
        assert_eq!(fs::read_to_string(&path)?, "a;;c\n");
        Ok(())
    }

    #[test]
    fn ignore_first_skips_header_line() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "col1;col2;col3\na;b;c\n")?;

        let spec =
            SimpleDelimitedFileSpec::new(";", 3, LineSeparator::Lf, 1, 0, false, false)?;
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].texts(), vec![Some("a"), Some("b"), Some("c")]);
        Ok(())
    }
}

#[cfg(feature = "format-fixed-width")]
mod fixed_width {
    use super::*;
    use textflow::{Alignment, FixedWidthFieldSpec, FixedWidthFileSpec};

    fn spec(separate: bool) -> FixedWidthFileSpec {
        FixedWidthFileSpec::new(
            10,
            separate,
            Alignment::Start,
            ' ',
            vec![FixedWidthFieldSpec::new(0, 4), FixedWidthFieldSpec::new(4, 6)],
            LineSeparator::Lf,
            0,
            0,
            false,
            false,
        )
        .unwrap()
    }

    #[test]
    fn rejects_region_outside_record_width() {
        let result = FixedWidthFileSpec::new(
            10,
            true,
            Alignment::Start,
            ' ',
            vec![FixedWidthFieldSpec::new(8, 4)],
            LineSeparator::Lf,
            0,
            0,
            false,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn reads_line_framed_records() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "ab  cdef  \nonly\n")?;

        let mut producer = spec(true).producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        assert_eq!(records[0].texts(), vec![Some("ab"), Some("cdef")]);
        // Second field is entirely past the end of the short line.
        assert_eq!(records[1].texts(), vec![Some("only"), None]);
        Ok(())
    }

    #[test]
    fn reads_width_framed_records() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        // Two records back to back without separators.
        fs::write(&path, "ab  cdef  wx  yz    ")?;

        let mut producer = spec(false).producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].texts(), vec![Some("ab"), Some("cdef")]);
        assert_eq!(records[1].texts(), vec![Some("wx"), Some("yz")]);
        Ok(())
    }

    #[test]
    fn fill_stripping_honors_alignment() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data.txt");
        fs::write(&path, "..ab......\n")?;

        let spec = FixedWidthFileSpec::new(
            10,
            true,
            Alignment::End,
            '.',
            vec![FixedWidthFieldSpec::new(0, 4), {
                let mut f = FixedWidthFieldSpec::new(4, 6);
                f.alignment = Some(Alignment::Start);
                f
            }],
            LineSeparator::Lf,
            0,
            0,
            false,
            false,
        )?;
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        // End alignment strips leading fill; start alignment strips trailing
        // fill, and an all-fill region reads as empty, not null.
        assert_eq!(records[0].texts(), vec![Some("ab"), Some("")]);
        Ok(())
    }

    #[test]
    fn writes_aligned_and_truncated_fields() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        let spec = FixedWidthFileSpec::new(
            10,
            true,
            Alignment::Start,
            ' ',
            vec![FixedWidthFieldSpec::new(0, 4), {
                let mut f = FixedWidthFieldSpec::new(4, 6);
                f.alignment = Some(Alignment::End);
                f.fill_char = Some('.');
                f
            }],
            LineSeparator::Lf,
            0,
            0,
            false,
            false,
        )?;
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![
                from_texts(vec![Some("ab"), Some("cd")]),
                from_texts(vec![Some("toolong"), None]),
            ],
        )?;

        assert_eq!(fs::read_to_string(&path)?, "ab  ....cd\ntool......\n");
        Ok(())
    }

    #[test]
    fn width_framed_write_has_no_separators() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        let mut consumer = spec(false).consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![
                from_texts(vec![Some("ab"), Some("cd")]),
                from_texts(vec![Some("ef"), Some("gh")]),
            ],
        )?;
        assert_eq!(fs::read_to_string(&path)?, "ab  cd    ef  gh    ");
        Ok(())
    }

    #[test]
    fn width_framing_counts_characters_not_bytes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        let mut consumer = spec(false).consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![
                from_texts(vec![Some("äöüß"), Some("abcd")]),
                from_texts(vec![Some("wx"), Some("yz")]),
            ],
        )?;

        // Multi-byte characters must not shift the framing of later records.
        let mut producer = spec(false).producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].texts(), vec![Some("äöüß"), Some("abcd")]);
        assert_eq!(records[1].texts(), vec![Some("wx"), Some("yz")]);
        Ok(())
    }
}

#[cfg(feature = "format-properties")]
mod properties {
    use super::*;
    use textflow::PropertiesFileSpec;

    #[test]
    fn reads_keys_values_and_skips_comments() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.properties");
        fs::write(
            &path,
            "# a comment\n! another\n\nkey1=value1\nkey2: value2\nkey3 value3\n",
        )?;

        let spec = PropertiesFileSpec::default();
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].key(), Some("key1"));
        assert_eq!(records[0].value_of_value_field(), Some("value1"));
        assert_eq!(records[1].key(), Some("key2"));
        assert_eq!(records[1].value_of_value_field(), Some("value2"));
        assert_eq!(records[2].key(), Some("key3"));
        assert_eq!(records[2].value_of_value_field(), Some("value3"));
        Ok(())
    }

    #[test]
    fn decodes_escape_sequences() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.properties");
        fs::write(&path, "a\\ b\\=c=tab\\there\\u0021\n")?;

        let spec = PropertiesFileSpec::default();
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        assert_eq!(records[0].key(), Some("a b=c"));
        assert_eq!(records[0].value_of_value_field(), Some("tab\there!"));
        Ok(())
    }

    #[test]
    fn joins_backslash_continued_lines() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.properties");
        fs::write(
            &path,
            "span\\\nning=joined\nkey=first \\\n    second half\nliteral=a\\\\\n",
        )?;

        let spec = PropertiesFileSpec::default();
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        assert_eq!(records.len(), 3);
        // A key may span lines too; leading whitespace of the continuation
        // line is dropped.
        assert_eq!(records[0].key(), Some("spanning"));
        assert_eq!(records[0].value_of_value_field(), Some("joined"));
        assert_eq!(records[1].key(), Some("key"));
        assert_eq!(records[1].value_of_value_field(), Some("first second half"));
        // An even number of trailing backslashes is a literal backslash,
        // not a continuation.
        assert_eq!(records[2].key(), Some("literal"));
        assert_eq!(records[2].value_of_value_field(), Some("a\\"));
        Ok(())
    }

    #[test]
    fn malformed_unicode_escape_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.properties");
        fs::write(&path, "key=\\u00zz\n")?;

        let spec = PropertiesFileSpec::default();
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        assert!(read_all(&mut producer).is_err());
        Ok(())
    }

    #[test]
    fn comment_as_category() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.properties");
        fs::write(&path, "# section one\na=1\n# section two\nb=2\n")?;

        let spec =
            PropertiesFileSpec::new(LineSeparator::Lf, true, String::new(), false, false);
        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let records = read_all(&mut producer)?;

        assert_eq!(records[0].category(), Some("section one"));
        assert_eq!(records[1].category(), Some("section two"));
        Ok(())
    }

    #[test]
    fn writes_escaped_keys_and_values() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.properties");

        let spec = PropertiesFileSpec::default();
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![Record::key_value(
                None,
                None,
                "a key:x".to_string(),
                Some(" leading and inner spaces".to_string()),
            )],
        )?;

        // The key escapes every space and separator; the value escapes only
        // its first character's space.
        assert_eq!(
            fs::read_to_string(&path)?,
            "a\\ key\\:x=\\ leading and inner spaces\n"
        );
        Ok(())
    }

    #[test]
    fn escape_unicode_writes_ascii_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.properties");

        let spec = PropertiesFileSpec::new(LineSeparator::Lf, false, String::new(), true, false);
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![Record::key_value(
                None,
                None,
                "grüße".to_string(),
                Some("日本".to_string()),
            )],
        )?;

        assert_eq!(
            fs::read_to_string(&path)?,
            "gr\\u00fc\\u00dfe=\\u65e5\\u672c\n"
        );
        Ok(())
    }

    #[test]
    fn category_as_key_prefix() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.properties");

        let spec = PropertiesFileSpec::new(LineSeparator::Lf, false, String::new(), false, true);
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![Record::key_value(
                Some("db".to_string()),
                None,
                "host".to_string(),
                Some("localhost".to_string()),
            )],
        )?;

        assert_eq!(fs::read_to_string(&path)?, "db.host=localhost\n");
        Ok(())
    }

    #[test]
    fn round_trip_with_escapes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("round.properties");

        let original = Record::key_value(
            None,
            None,
            "key with = and spaces".to_string(),
            Some("value\twith\ttabs".to_string()),
        );
        let spec = PropertiesFileSpec::default();
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(&mut consumer, vec![original.clone()])?;

        let mut producer = spec.producer(CharsetCoding::Strict.open_reader(&path)?);
        let reread = read_all(&mut producer)?;
        assert_eq!(reread[0].key(), original.key());
        assert_eq!(reread[0].value_of_value_field(), original.value_of_value_field());
        Ok(())
    }
}

#[cfg(feature = "format-markdown")]
mod markdown {
    use super::*;
    use textflow::{
        Alignment, BulletPoint, MarkdownListFileSpec, MarkdownTableFieldSpec,
        MarkdownTableFileSpec,
    };

    #[test]
    fn table_writes_header_and_aligned_cells() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.md");

        let spec = MarkdownTableFileSpec::write(
            LineSeparator::Lf,
            None,
            None,
            vec![
                MarkdownTableFieldSpec::new("name").with_min_width(5),
                MarkdownTableFieldSpec::new("n")
                    .with_min_width(5)
                    .with_alignment(Alignment::End),
            ],
            Alignment::Start,
        );
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![
                from_texts(vec![Some("ab"), Some("1")]),
                from_texts(vec![None, Some("12345")]),
            ],
        )?;

        assert_eq!(
            fs::read_to_string(&path)?,
            concat!(
                "| name  |     n |\n",
                "|:------|------:|\n",
                "| ab    |     1 |\n",
                "|       | 12345 |\n",
            )
        );
        Ok(())
    }

    #[test]
    fn table_escapes_pipes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.md");

        let spec = MarkdownTableFileSpec::write(
            LineSeparator::Lf,
            None,
            None,
            vec![MarkdownTableFieldSpec::new("c").with_min_width(4)],
            Alignment::Start,
        );
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(&mut consumer, vec![from_texts(vec![Some("a|b")])])?;

        let content = fs::read_to_string(&path)?;
        assert!(content.contains("a\\|b"));
        Ok(())
    }

    #[test]
    fn list_markers() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.md");

        for (bullet, expected) in [
            (BulletPoint::Star, "* a\n* b\n"),
            (BulletPoint::Dash, "- a\n- b\n"),
            (BulletPoint::Number, "1. a\n2. b\n"),
        ] {
            let spec = MarkdownListFileSpec::write(LineSeparator::Lf, None, None, bullet, false);
            let mut consumer = spec.consumer(create_writer(&path)?);
            write_all(
                &mut consumer,
                vec![
                    Record::of_value(None, None, Some("a".to_string())),
                    Record::of_value(None, None, Some("b".to_string())),
                ],
            )?;
            assert_eq!(fs::read_to_string(&path)?, expected);
        }
        Ok(())
    }

    #[test]
    fn list_null_values() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.md");

        let null_record = Record::of_value(None, None, None);

        let keeping =
            MarkdownListFileSpec::write(LineSeparator::Lf, None, None, BulletPoint::Star, false);
        let mut consumer = keeping.consumer(create_writer(&path)?);
        write_all(&mut consumer, vec![null_record.clone()])?;
        assert_eq!(fs::read_to_string(&path)?, "* \n");

        let skipping =
            MarkdownListFileSpec::write(LineSeparator::Lf, None, None, BulletPoint::Star, true);
        let mut consumer = skipping.consumer(create_writer(&path)?);
        write_all(&mut consumer, vec![null_record])?;
        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn list_text_before_and_after() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.md");

        let spec = MarkdownListFileSpec::write(
            LineSeparator::Lf,
            Some("My list".to_string()),
            Some("done".to_string()),
            BulletPoint::Dash,
            false,
        );
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![Record::of_value(None, None, Some("x".to_string()))],
        )?;
        assert_eq!(fs::read_to_string(&path)?, "My list\n- x\ndone\n");
        Ok(())
    }
}

#[cfg(feature = "format-html")]
mod html_table {
    use super::*;
    use textflow::{HtmlTableFieldSpec, HtmlTableFileSpec};

    #[test]
    fn writes_escaped_table() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.html");

        let spec = HtmlTableFileSpec::write(
            LineSeparator::Lf,
            None,
            None,
            vec![
                HtmlTableFieldSpec::new("a"),
                HtmlTableFieldSpec::new("b"),
            ],
            None,
        );
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(
            &mut consumer,
            vec![
                from_texts(vec![Some("x<y&z>"), Some("plain")]),
                from_texts(vec![None, Some("")]),
            ],
        )?;

        assert_eq!(
            fs::read_to_string(&path)?,
            concat!(
                "<table>\n",
                "<tr>\n",
                "<th>a</th><th>b</th>\n",
                "</tr>\n",
                "<tr>\n",
                "<td>x&lt;y&amp;z&gt;</td><td>plain</td>\n",
                "</tr>\n",
                "<tr>\n",
                "<td>&nbsp;</td><td>&nbsp;</td>\n",
                "</tr>\n",
                "</table>\n",
            )
        );
        Ok(())
    }

    #[test]
    fn indentation_and_surrounding_text() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.html");

        let spec = HtmlTableFileSpec::write(
            LineSeparator::Lf,
            Some("<div>".to_string()),
            Some("</div>".to_string()),
            vec![HtmlTableFieldSpec::new("c")],
            Some("  ".to_string()),
        );
        let mut consumer = spec.consumer(create_writer(&path)?);
        write_all(&mut consumer, vec![from_texts(vec![Some("v")])])?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("<div>\n  <table>\n"));
        assert!(content.contains("  <td>v</td>\n"));
        assert!(content.ends_with("  </table>\n</div>\n"));
        Ok(())
    }
}
