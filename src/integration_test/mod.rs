mod task_api;
