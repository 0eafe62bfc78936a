use super::Selection;
use crate::api::{DeleteClientItem, DeleteClientsRequest, DeleteGroupItem, DeleteGroupsRequest};
use crate::domain::{group_key, ClientKey, Group, GroupKey};

pub fn delete_clients_prompt(count: usize) -> String {
    format!("Delete {count} client(s)?")
}

pub fn delete_groups_prompt(count: usize) -> String {
    format!("Delete {count} group(s)?")
}

/// One batch item per selected key: the configured broker plus the identifier
/// half of the key. Keys without a separator are skipped.
pub fn build_delete_clients_request(
    broker: &str,
    selection: &Selection<ClientKey>,
) -> DeleteClientsRequest {
    let items = selection
        .iter()
        .filter_map(ClientKey::identifier)
        .map(|userid| DeleteClientItem {
            broker: broker.to_string(),
            userid: userid.to_string(),
        })
        .collect();
    DeleteClientsRequest { items }
}

/// Groups are deleted by server id; selected groups that were never saved have
/// no id and are left out.
pub fn build_delete_groups_request(
    selection: &Selection<GroupKey>,
    groups: &[Group],
) -> DeleteGroupsRequest {
    let items = groups
        .iter()
        .filter(|group| selection.contains(&group_key(group)))
        .filter_map(|group| group.id.clone())
        .map(|id| DeleteGroupItem { id })
        .collect();
    DeleteGroupsRequest { items }
}
