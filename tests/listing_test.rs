use edudash::models::{ClassData, ClassType, TeacherRef};
use edudash::services::listing::{ListQuery, filter_by_term, paginate};

fn class(i: usize, name: &str, class_type: ClassType, teacher: Option<&str>) -> ClassData {
    ClassData {
        id: format!("c{}", i),
        name: name.to_string(),
        student_count: 10,
        lessons_per_week: 2,
        class_type,
        teacher: teacher.map(|n| TeacherRef {
            id: format!("t-{}", n),
            name: n.to_string(),
        }),
        created_at: None,
        updated_at: None,
        students: None,
    }
}

fn fifty_classes() -> Vec<ClassData> {
    (0..50)
        .map(|i| {
            let class_type = if i % 2 == 0 { ClassType::Speaking } else { ClassType::Grammar };
            class(i, &format!("Lớp IELTS {}", i), class_type, Some("Trần Thị Bình"))
        })
        .collect()
}

#[test]
fn test_empty_term_returns_everything_in_order() {
    let classes = fifty_classes();
    let filtered = filter_by_term(&classes, "");
    assert_eq!(filtered.len(), 50);
    assert_eq!(filtered, classes);

    assert_eq!(filter_by_term(&classes, "   ").len(), 50);
}

#[test]
fn test_no_match_returns_empty() {
    let classes = fifty_classes();
    assert!(filter_by_term(&classes, "không có lớp này").is_empty());
}

#[test]
fn test_matches_any_field_case_insensitively() {
    let classes = vec![
        class(1, "Giao tiếp cơ bản", ClassType::Communication, None),
        class(2, "TOEIC 500", ClassType::Listening, Some("Lê Văn Cường")),
        class(3, "Ngữ pháp nâng cao", ClassType::Grammar, Some("Phạm Thu")),
    ];

    let by_name = filter_by_term(&classes, "toeic");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, "c2");

    let by_teacher = filter_by_term(&classes, "CƯỜNG");
    assert_eq!(by_teacher.len(), 1);
    assert_eq!(by_teacher[0].id, "c2");

    let by_type_label = filter_by_term(&classes, "ngữ pháp");
    assert_eq!(by_type_label.len(), 1);
    assert_eq!(by_type_label[0].id, "c3");
}

#[test]
fn test_filtering_is_idempotent() {
    let classes = fifty_classes();
    let once = filter_by_term(&classes, "ielts 1");
    let twice = filter_by_term(&once, "ielts 1");
    assert_eq!(once, twice);
    assert_eq!(once.len(), 11);
}

#[test]
fn test_pagination_slices() {
    let items: Vec<u32> = (0..23).collect();

    let first = paginate(&items, 0, 10);
    assert_eq!(first.items, (0..10).collect::<Vec<_>>());
    assert_eq!(first.total, 23);
    assert_eq!(first.total_pages, 3);

    let last = paginate(&items, 2, 10);
    assert_eq!(last.items, vec![20, 21, 22]);

    assert!(paginate(&items, 3, 10).items.is_empty());
    assert!(paginate(&items, usize::MAX, 10).items.is_empty());
    assert!(paginate(&items, 0, 0).items.is_empty());
    assert!(paginate::<u32>(&[], 0, 10).items.is_empty());
}

#[test]
fn test_list_query_filters_then_pages() {
    let classes = fifty_classes();
    let query = ListQuery {
        search: Some("ielts".to_string()),
        page: Some(4),
        page_size: Some(12),
    };

    let page = query.apply(&classes);
    assert_eq!(page.total, 50);
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "c48");

    let defaults = ListQuery::default().apply(&classes);
    assert_eq!(defaults.items.len(), 10);
    assert_eq!(defaults.page, 0);
}
