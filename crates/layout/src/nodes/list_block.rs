use crate::LayoutError;
use crate::interface::{ElementProducer, LayoutContext, LayoutEnvironment};
use crate::nodes::block::BlockShell;
use crate::nodes::list_item::produce_list_item;
use crate::nodes::{BlockElements, stack_children};
use folio_fo::ListBlock;

impl ElementProducer for ListBlock {
    fn produce_elements(
        &self,
        ctx: &LayoutContext,
        env: &LayoutEnvironment,
    ) -> Result<BlockElements, LayoutError> {
        let shell = BlockShell::from_props(&self.props, "list-block", ctx);
        let inner_ctx = shell.content_context(ctx, &self.props);
        let items = self
            .items
            .iter()
            .map(|item| produce_list_item(item, self, &inner_ctx, env))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("list-block with {} items", items.len());
        Ok(shell.wrap(stack_children(items, shell.keep_together)))
    }
}
