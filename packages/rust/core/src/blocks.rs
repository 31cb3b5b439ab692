//! Flattening of page content blocks into frontend records.

use postfeed_notion::{Block as NotionBlock, BlockKind, TextContent};
use postfeed_shared::{Block, TextBlock};

/// Map one remote block to its flattened record.
///
/// Total over every block type: anything without a text mapping becomes
/// [`Block::Unsupported`]. Only the first rich-text run contributes.
pub fn flatten(block: &NotionBlock) -> Block {
    let id = &block.id;
    match &block.kind {
        BlockKind::Heading1 { heading_1 } => Block::Heading1(text_block(id, heading_1)),
        BlockKind::Heading2 { heading_2 } => Block::Heading2(text_block(id, heading_2)),
        BlockKind::Heading3 { heading_3 } => Block::Heading3(text_block(id, heading_3)),
        BlockKind::Paragraph { paragraph } => Block::Paragraph(text_block(id, paragraph)),
        BlockKind::BulletedListItem { bulleted_list_item } => {
            Block::BulletedListItem(text_block(id, bulleted_list_item))
        }
        BlockKind::NumberedListItem { numbered_list_item } => {
            Block::NumberedListItem(text_block(id, numbered_list_item))
        }
        BlockKind::Unsupported => Block::Unsupported { id: id.clone() },
    }
}

/// Flatten a list of blocks, keeping document order.
pub fn flatten_all(blocks: &[NotionBlock]) -> Vec<Block> {
    blocks.iter().map(flatten).collect()
}

fn text_block(id: &str, content: &TextContent) -> TextBlock {
    let run = content.first_run();
    TextBlock {
        id: id.to_string(),
        text: run.map(|r| r.plain_text.clone()).unwrap_or_default(),
        href: run.and_then(|r| r.href.clone()).unwrap_or_default(),
        annotations: run.and_then(|r| r.annotations.clone()),
    }
}
