use derive_new::new;

#[derive(new, Debug)]
pub struct CreateUser {
    pub email: String,
}
