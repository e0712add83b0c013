#[cfg(test)]
mod attendance_list_tests {
    use ensaio_local_server::attendance::{
        AttendanceListGenerator, AttendanceRequest, Generator,
    };
    use ensaio_local_server::config::AttendanceLayout;
    use ensaio_local_server::docx::{read_document, Alignment, Block, Paragraph};

    fn request(musicians: Vec<String>, organists: Vec<String>) -> AttendanceRequest {
        AttendanceRequest {
            musicians: Some(musicians),
            organists: Some(organists),
            date_text: None,
        }
    }

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Músico {i:03}")).collect()
    }

    #[test]
    fn test_row_count_is_names_plus_padding_plus_header() {
        let generator = AttendanceListGenerator::default();
        for count in [0, 1, 7, 42, 100] {
            let sheet = request(names(count), vec![]).normalize();
            let document = generator.assemble(&sheet);
            let musicians = document.tables().next().unwrap();
            assert_eq!(musicians.rows.len(), count + 15 + 1, "K = {count}");
        }
    }

    #[test]
    fn test_two_sections_musicians_then_organists() {
        let generator = AttendanceListGenerator::default();
        let sheet = request(vec!["Ana".into()], vec!["Bia".into()]).normalize();
        let document = generator.assemble(&sheet);

        let sections = document.sections();
        assert_eq!(sections.len(), 2);

        let header_of = |blocks: &[Block]| match blocks.last() {
            Some(Block::Table(table)) => table.rows[0].cells[0].text(),
            _ => panic!("section does not end with a table"),
        };
        assert_eq!(header_of(sections[0]), "MÚSICOS - NOME");
        assert_eq!(header_of(sections[1]), "ORGANISTAS - NOME");
    }

    #[test]
    fn test_written_package_round_trips() {
        let generator = AttendanceListGenerator::default();
        let musicians = vec!["bob".to_string(), "Alice".to_string(), " Zé ".to_string()];
        let generated = generator
            .generate(request(musicians, vec!["Carla".to_string()]))
            .unwrap();

        let sheet = request(
            vec!["bob".to_string(), "Alice".to_string(), " Zé ".to_string()],
            vec!["Carla".to_string()],
        )
        .normalize();
        let expected = generator.assemble(&sheet);
        let actual = read_document(&generated.bytes).unwrap();

        assert_eq!(actual.page, expected.page);
        let expected_tables: Vec<_> = expected.tables().collect();
        let actual_tables: Vec<_> = actual.tables().collect();
        assert_eq!(actual_tables.len(), expected_tables.len());
        for (a, e) in actual_tables.iter().zip(&expected_tables) {
            assert_eq!(a.rows.len(), e.rows.len());
            assert_eq!(a.columns, e.columns);
            assert_eq!(a.width, e.width);
            for (ar, er) in a.rows.iter().zip(&e.rows) {
                assert_eq!(ar.repeat_header, er.repeat_header);
                assert_eq!(ar.cant_split, er.cant_split);
                let at: Vec<_> = ar.cells.iter().map(|c| c.text()).collect();
                let et: Vec<_> = er.cells.iter().map(|c| c.text()).collect();
                assert_eq!(at, et);
            }
        }

        let actual_text: Vec<String> = actual.paragraphs().map(Paragraph::text).collect();
        let expected_text: Vec<String> = expected.paragraphs().map(Paragraph::text).collect();
        assert_eq!(actual_text, expected_text);

        let first = &actual_tables[0];
        assert_eq!(first.rows[1].cells[0].text(), "Alice");
        assert_eq!(first.rows[2].cells[0].text(), "bob");
        assert_eq!(first.rows[3].cells[0].text(), "Zé");
    }

    #[test]
    fn test_header_paragraph_formatting_survives_serialization() {
        let generator = AttendanceListGenerator::default();
        let generated = generator.generate(AttendanceRequest::default()).unwrap();
        let document = read_document(&generated.bytes).unwrap();

        let institution = document.paragraphs().next().unwrap();
        assert_eq!(institution.format.alignment, Some(Alignment::Center));
        let run = &institution.runs[0];
        assert!(run.format.bold);
        assert_eq!(run.format.size, Some(28));
        assert_eq!(run.format.font_name.as_deref(), Some("Cambria"));

        let title = document
            .paragraphs()
            .find(|p| p.text() == "MÚSICOS")
            .unwrap();
        assert!(title.format.keep_with_next);
    }

    #[test]
    fn test_custom_layout_padding() {
        let layout = AttendanceLayout {
            padding_rows: 3,
            ..AttendanceLayout::default()
        };
        let generator = AttendanceListGenerator::new(layout);
        let document = generator.assemble(&request(names(2), names(0)).normalize());
        let counts: Vec<usize> = document.tables().map(|t| t.rows.len()).collect();
        assert_eq!(counts, vec![6, 4]);
    }
}
