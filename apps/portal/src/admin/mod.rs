// Administrator screens: user list (`/biodata`) and user detail/edit (`/biodata/:id`).

pub mod handlers;
