use std::cell::RefCell;

use mockup_ai::{AiError, ImageService};
use mockup_core::{ImagePayload, ImageSize};
use mockup_editor::{EditError, StudioSession, StudioView};

/// Answers edits from a script and records what it was asked.
struct ScriptedEdits {
    replies: RefCell<Vec<&'static str>>,
    seen: RefCell<Vec<(String, String)>>,
}

impl ScriptedEdits {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: RefCell::new(replies.to_vec()),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl ImageService for ScriptedEdits {
    fn generate(&self, _prompt: &str, _size: ImageSize) -> Result<ImagePayload, AiError> {
        Ok(ImagePayload::parse("R0VORVJBVEVE").unwrap())
    }

    fn edit(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload, AiError> {
        self.seen
            .borrow_mut()
            .push((image.base64_data().to_string(), instruction.to_string()));
        let reply = self.replies.borrow_mut().remove(0);
        Ok(ImagePayload::parse(format!("data:image/png;base64,{reply}")).unwrap())
    }
}

fn b64(reply: &str) -> ImagePayload {
    ImagePayload::parse(format!("data:image/png;base64,{reply}")).unwrap()
}

#[test]
fn upload_edit_undo_redo_edit() {
    let service = ScriptedEdits::new(&["QkJC", "Q0ND"]);
    let mut session = StudioSession::default();
    session.set_view(StudioView::Edit);

    // upload A
    session.drop_zone.on_drag_enter(true);
    session.drop_on_editor("image/png", b"AAA").unwrap();
    let a = session.editor.history().present().cloned().unwrap();
    assert_eq!(a.base64_data(), "QUFB");

    // "make it blue" -> B
    session.editor.set_instruction("make it blue");
    session.editor.apply_edit(&service).unwrap();
    let h = session.editor.history();
    assert_eq!(h.present(), Some(&b64("QkJC")));
    assert_eq!(h.past(), &[a.clone()]);
    assert!(h.future().is_empty());

    // undo
    session.editor.undo();
    let h = session.editor.history();
    assert_eq!(h.present(), Some(&a));
    assert!(h.past().is_empty());
    assert_eq!(h.future(), &[b64("QkJC")]);

    // redo
    session.editor.redo();
    let h = session.editor.history();
    assert_eq!(h.present(), Some(&b64("QkJC")));
    assert_eq!(h.past(), &[a.clone()]);
    assert!(h.future().is_empty());

    // "add grain" -> C
    session.editor.set_instruction("add grain");
    session.editor.apply_edit(&service).unwrap();
    let h = session.editor.history();
    assert_eq!(h.present(), Some(&b64("Q0ND")));
    assert_eq!(h.past(), &[a.clone(), b64("QkJC")]);
    assert!(h.future().is_empty());

    // the service saw bare base64 of the then-current image
    let seen = service.seen.borrow();
    assert_eq!(seen[0], ("QUFB".to_string(), "make it blue".to_string()));
    assert_eq!(seen[1], ("QkJC".to_string(), "add grain".to_string()));
}

#[test]
fn compare_while_editing_shows_previous_without_mutating() {
    let service = ScriptedEdits::new(&["QkJC"]);
    let mut session = StudioSession::default();
    session.upload_logo("image/png", b"AAA").unwrap();
    session.edit_logo().unwrap();

    session.editor.set_instruction("make it blue");
    session.editor.apply_edit(&service).unwrap();
    let before = session.editor.history().clone();

    session.compare.start();
    assert_eq!(session.editor_display(), session.uploaded_logo());
    session.compare.end();
    assert_eq!(session.editor_display(), Some(&b64("QkJC")));
    assert_eq!(session.editor.history(), &before);
}

#[test]
fn interleaved_submission_is_rejected_until_first_resolves() {
    let mut session = StudioSession::default();
    session.upload_logo("image/png", b"AAA").unwrap();
    session.edit_logo().unwrap();

    session.editor.set_instruction("make it blue");
    let first = session.editor.begin_edit().unwrap();

    session.editor.set_instruction("add grain");
    assert!(matches!(session.editor.begin_edit(), Err(EditError::Busy)));

    session.editor.complete_edit(first, Ok(b64("QkJC"))).unwrap();
    assert_eq!(session.editor.history().past().len(), 1);

    // the instruction typed while pending is cleared along with the commit
    assert_eq!(session.editor.instruction(), "");
}

#[test]
fn generated_candidate_loads_via_select() {
    let service = ScriptedEdits::new(&[]);
    let mut session = StudioSession::default();
    session.set_view(StudioView::Generate);
    session.generation.set_prompt("coffee shop logo");
    session.generation.generate(&service).unwrap();

    // an unrelated history is replaced, not extended
    session.upload_logo("image/png", b"AAA").unwrap();
    session.edit_logo().unwrap();
    session.edit_generated().unwrap();

    let h = session.editor.history();
    assert_eq!(h.present().unwrap().base64_data(), "R0VORVJBVEVE");
    assert!(h.past().is_empty());
    assert!(h.future().is_empty());
}
