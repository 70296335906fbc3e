//! Demo archive used by `archivist seed` and the test suites

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    ArchivedMessage, Attachment, MessageStatus, MessageType, Priority, recipient, sender,
};

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

/// Six archived messages, most recently archived first
///
/// Three are starred, two carry attachments, one is tagged `conference`,
/// and the first three are high, medium and low priority.
pub fn sample_archive() -> Vec<ArchivedMessage> {
    vec![
        ArchivedMessage::builder(
            "arch-1",
            recipient("lect-17", "Dr. Sarah Johnson", "s.johnson@university.edu"),
        )
        .subject("Research Conference Registration")
        .content(
            "Hi Dr. Johnson, I have completed my registration for the International \
             Conference on Educational Technology. The confirmation is attached.",
        )
        .course("CS401")
        .message_type(MessageType::Academic)
        .priority(Priority::High)
        .attachment(Attachment::new("conference-registration.pdf", 245_760, "application/pdf"))
        .original_date(at(2024, 3, 10, 9))
        .last_activity(at(2024, 3, 12, 10))
        .archived_at(at(2024, 3, 25, 14))
        .status(MessageStatus::Sent)
        .message_count(3)
        .tags(["conference", "research"])
        .starred(true)
        .archive_reason("Event completed")
        .build(),
        ArchivedMessage::builder(
            "arch-2",
            sender("lect-04", "Prof. Michael Chen", "m.chen@university.edu"),
        )
        .subject("Midterm Grade Review")
        .content(
            "Your midterm review meeting is confirmed for Thursday. Bring your graded \
             paper and any questions about the marking scheme.",
        )
        .course("CS201")
        .message_type(MessageType::Academic)
        .priority(Priority::Medium)
        .original_date(at(2024, 3, 1, 8))
        .last_activity(at(2024, 3, 2, 16))
        .archived_at(at(2024, 3, 20, 11))
        .status(MessageStatus::Received)
        .message_count(2)
        .tags(["grades", "midterm"])
        .starred(true)
        .unread_replies(true)
        .build(),
        ArchivedMessage::builder(
            "arch-3",
            recipient("office-02", "Student Affairs Office", "affairs@university.edu"),
        )
        .subject("Scholarship Application Follow-up")
        .content(
            "Dear Student Affairs team, I am following up on my scholarship application \
             submitted last month. I have attached the updated transcript and a \
             recommendation letter.",
        )
        .message_type(MessageType::Administrative)
        .priority(Priority::Low)
        .attachments(vec![
            Attachment::new("transcript.pdf", 512_000, "application/pdf"),
            Attachment::new(
                "recommendation-letter.docx",
                48_128,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
        ])
        .original_date(at(2024, 2, 20, 16))
        .archived_at(at(2024, 3, 15, 9))
        .status(MessageStatus::Draft)
        .tags(["scholarship", "financial-aid"])
        .archive_reason("Submitted through the portal instead")
        .build(),
        ArchivedMessage::builder(
            "arch-4",
            recipient("staff-11", "Lab Coordinator", "labs@university.edu"),
        )
        .subject("Lab Equipment Request")
        .content("Requesting two additional oscilloscopes for the Tuesday lab section.")
        .course("CS301")
        .message_type(MessageType::Administrative)
        .priority(Priority::Medium)
        .original_date(at(2024, 2, 10, 13))
        .last_activity(at(2024, 2, 14, 9))
        .archived_at(at(2024, 3, 5, 10))
        .status(MessageStatus::Sent)
        .message_count(4)
        .tags(["lab", "equipment"])
        .build(),
        ArchivedMessage::builder(
            "arch-5",
            sender("office-01", "Dean's Office", "dean@university.edu"),
        )
        .subject("Semester Schedule Update")
        .content("The spring semester schedule has been updated. Final exams now begin on May 6.")
        .message_type(MessageType::General)
        .priority(Priority::Low)
        .original_date(at(2024, 1, 15, 12))
        .archived_at(at(2024, 2, 28, 15))
        .status(MessageStatus::Received)
        .tags(["schedule"])
        .starred(true)
        .build(),
        ArchivedMessage::builder(
            "arch-6",
            sender("group-07", "Study Group", "cs201-group@university.edu"),
        )
        .subject("Project Meeting Notes")
        .content("Notes from Friday: split the report into four sections, draft due next week.")
        .course("CS201")
        .message_type(MessageType::General)
        .priority(Priority::Medium)
        .original_date(at(2024, 1, 5, 18))
        .last_activity(at(2024, 1, 20, 11))
        .archived_at(at(2024, 2, 1, 8))
        .status(MessageStatus::Received)
        .message_count(5)
        .tags(["project", "meeting"])
        .build(),
    ]
}
