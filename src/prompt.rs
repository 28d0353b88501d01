//! Inspection prompt construction
//!
//! Builds the fixed system instruction and the per-blade user turn fed to
//! the model provider. The user turn is an ordered content sequence: one
//! descriptive text item followed by the image references for each modality
//! that has files, RGB block first, thermal block second. A modality with
//! no files contributes nothing, not an empty block.

use crate::grouping::{BladeGroup, ImageFile};
use crate::llm::{ContentItem, Conversation};

/// Fixed system instruction describing the inspection task and the five
/// required report facets. Not parameterized.
pub const SYSTEM_PROMPT: &str = "You are a senior expert specializing in wind turbine rotor blade inspection.\n\
You need to inspect RGB (visual) images and thermal images for the turbine blade.\n\
Please generate a comprehensive inspection report that includes (but not limited to):\n \
- Observed anomalies or damage (e.g., cracks, erosion, delamination)\n \
- Thermal anomalies or hotspots\n \
- Severity assessment and potential causes\n \
- Recommended maintenance or repair actions\n \
- Implications for turbine performance\n";

/// Build the full conversation for one blade group.
pub fn build_conversation(group: &BladeGroup) -> Conversation {
    let mut user_content = Vec::with_capacity(group.image_count() + 2);

    push_modality_block(&mut user_content, &group.rgb, "RGB", &group.blade_id);
    push_modality_block(&mut user_content, &group.thermal, "thermal", &group.blade_id);

    Conversation {
        system: SYSTEM_PROMPT.to_string(),
        user_content,
    }
}

/// Append one modality's descriptive text item and image references.
/// Emits nothing when the file list is empty.
fn push_modality_block(
    content: &mut Vec<ContentItem>,
    files: &[ImageFile],
    label: &str,
    blade_id: &str,
) {
    if files.is_empty() {
        return;
    }

    content.push(ContentItem::Text(format!(
        "Below are {} {} images for {}:",
        files.len(),
        label,
        blade_id
    )));
    for file in files {
        content.push(ContentItem::Image(file.path.clone()));
    }
}
